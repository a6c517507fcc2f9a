//! HTTP API
//!
//! Route assembly and shared state for the compendium, auth, user, and
//! viewport surfaces. Handlers stay thin: parameter parsing on the way
//! in, status mapping on the way out, all evaluation in `core` and
//! `database`.

pub mod auth;
pub mod compendium;
pub mod users;
pub mod viewports;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::core::registry::SystemRegistry;
use crate::database::Database;

/// Shared state for all handlers.
pub struct AppState {
    pub registry: Arc<SystemRegistry>,
    pub db: Database,
    /// Bearer token -> user id for logged-in sessions.
    pub sessions: RwLock<HashMap<String, String>>,
}

impl AppState {
    pub fn new(registry: Arc<SystemRegistry>, db: Database) -> Self {
        Self {
            registry,
            db,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Everything behind the bearer-token check
    let authed = Router::new()
        .route("/api/v1/users", post(users::create_user).get(users::list_users))
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/scenes/:scene_id/viewport",
            get(viewports::get_viewport).put(viewports::save_viewport),
        )
        .route("/api/v1/auth/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route(
            "/api/v1/compendium/:system_id/types",
            get(compendium::list_types),
        )
        .route(
            "/api/v1/compendium/:system_id/:content_type",
            get(compendium::search),
        )
        .route(
            "/api/v1/compendium/:system_id/:content_type/:entry_id",
            get(compendium::get_entry),
        )
        .route("/api/v1/auth/login", post(auth::login))
        .route("/health", get(health_check))
        .merge(authed)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "version": crate::VERSION }))
}

/// Uniform error payload: `{"error": "<message>"}`.
pub(crate) fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Defensive catch-all: log the real failure, surface a generic message.
pub(crate) fn internal_error(context: &str, error: impl std::fmt::Display) -> Response {
    log::error!("{context}: {error}");
    error_json(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}
