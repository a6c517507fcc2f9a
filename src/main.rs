use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rand::distributions::Alphanumeric;
use rand::Rng;

use grimoire::api::{self, AppState};
use grimoire::config::AppConfig;
use grimoire::core::registry::SystemRegistry;
use grimoire::database::users::UserOps;
use grimoire::database::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let _log_guard = grimoire::core::logging::init();
    log::info!("{} v{} starting", grimoire::NAME, grimoire::VERSION);

    let config = AppConfig::load();

    let db = Database::new(&config.data_dir())
        .await
        .context("failed to open database")?;
    seed_admin_user(&db).await.context("failed to seed admin user")?;

    let packs_dir = config.packs_dir();
    let registry = match SystemRegistry::load_from_dir(&packs_dir) {
        Ok(registry) => registry,
        Err(e) => {
            // A fresh install has no packs yet; serve an empty registry
            log::warn!("Could not load system packs from {}: {e}", packs_dir.display());
            SystemRegistry::new()
        }
    };

    let state = Arc::new(AppState::new(Arc::new(registry), db));
    let app = api::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    log::info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("Shutdown complete");
    Ok(())
}

/// First-run bootstrap: an empty users table gets an admin account so
/// the authenticated surface is reachable. The password comes from
/// GRIMOIRE_ADMIN_PASSWORD, or is generated and logged once.
async fn seed_admin_user(db: &Database) -> anyhow::Result<()> {
    if db.count_users().await? > 0 {
        return Ok(());
    }

    let (password, generated) = match std::env::var("GRIMOIRE_ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => (password, false),
        _ => {
            let password: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(16)
                .map(char::from)
                .collect();
            (password, true)
        }
    };

    let password_hash = grimoire::api::auth::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    let user = grimoire::database::models::UserRecord::new(
        "admin".to_string(),
        password_hash,
        "admin".to_string(),
    );
    db.create_user(&user).await?;

    if generated {
        log::warn!("Created initial admin user with generated password: {password}");
        log::warn!("Set GRIMOIRE_ADMIN_PASSWORD before first run to choose it yourself");
    } else {
        log::info!("Created initial admin user");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    log::info!("Shutdown signal received");
}
