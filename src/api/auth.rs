//! Authentication
//!
//! Password login issuing bearer tokens, the session middleware that
//! guards the CRUD surface, and argon2 password hashing helpers.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::users::UserResponse;
use super::{error_json, internal_error, AppState};
use crate::database::users::UserOps;

/// Identity attached to the request after the token check passes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Password Hashing
// ============================================================================

/// Hash a password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC string. A malformed stored
/// hash counts as a failed verification, not a server error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

// ============================================================================
// Handlers
// ============================================================================

/// Login endpoint: verify credentials, issue a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let user = match state.db.get_user_by_username(&request.username).await {
        Ok(Some(user)) => user,
        // Same response for unknown user and bad password
        Ok(None) => return error_json(StatusCode::UNAUTHORIZED, "invalid credentials"),
        Err(e) => return internal_error("login lookup failed", e),
    };

    if !verify_password(&request.password, &user.password_hash) {
        return error_json(StatusCode::UNAUTHORIZED, "invalid credentials");
    }

    let token = uuid::Uuid::new_v4().to_string();
    state
        .sessions
        .write()
        .await
        .insert(token.clone(), user.id.clone());

    log::info!("User '{}' logged in", user.username);
    Json(serde_json::json!({
        "token": token,
        "user": UserResponse::from(user),
    }))
    .into_response()
}

/// Logout endpoint: revoke the presented token.
pub async fn logout(State(state): State<Arc<AppState>>, request: Request) -> Response {
    if let Some(token) = bearer_token(&request) {
        state.sessions.write().await.remove(token);
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Middleware guarding the authenticated surface. Attaches [`AuthUser`]
/// to the request extensions on success.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return error_json(StatusCode::UNAUTHORIZED, "missing bearer token");
    };

    let user_id = state.sessions.read().await.get(token).cloned();
    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(AuthUser { user_id });
            next.run(request).await
        }
        None => error_json(StatusCode::UNAUTHORIZED, "invalid or expired token"),
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }
}
