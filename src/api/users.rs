//! User route handlers
//!
//! Authenticated CRUD over user records. Password hashes never leave
//! the database layer; responses carry [`UserResponse`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::auth::hash_password;
use super::{error_json, internal_error, AppState};
use crate::database::models::UserRecord;
use crate::database::users::UserOps;

/// User representation returned by the API (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_role() -> String {
    "player".to_string()
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /api/v1/users`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Response {
    if request.username.trim().is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "username must not be empty");
    }
    if request.password.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "password must not be empty");
    }

    match state.db.get_user_by_username(&request.username).await {
        Ok(Some(_)) => {
            return error_json(
                StatusCode::CONFLICT,
                format!("username already taken: {}", request.username),
            )
        }
        Ok(None) => {}
        Err(e) => return internal_error("user lookup failed", e),
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("password hashing failed", e),
    };

    let mut user = UserRecord::new(request.username, password_hash, request.role);
    user.display_name = request.display_name;

    match state.db.create_user(&user).await {
        Ok(()) => {
            log::info!("Created user '{}'", user.username);
            (StatusCode::CREATED, Json(UserResponse::from(user))).into_response()
        }
        Err(e) => internal_error("user insert failed", e),
    }
}

/// `GET /api/v1/users`
pub async fn list_users(State(state): State<Arc<AppState>>) -> Response {
    match state.db.list_users().await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            Json(serde_json::json!({ "users": users })).into_response()
        }
        Err(e) => internal_error("user list failed", e),
    }
}

/// `GET /api/v1/users/:id`
pub async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.db.get_user(&id).await {
        Ok(Some(user)) => Json(UserResponse::from(user)).into_response(),
        Ok(None) => error_json(StatusCode::NOT_FOUND, format!("User not found: {id}")),
        Err(e) => internal_error("user lookup failed", e),
    }
}

/// `PUT /api/v1/users/:id`
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Response {
    let mut user = match state.db.get_user(&id).await {
        Ok(Some(user)) => user,
        Ok(None) => return error_json(StatusCode::NOT_FOUND, format!("User not found: {id}")),
        Err(e) => return internal_error("user lookup failed", e),
    };

    if let Some(display_name) = request.display_name {
        user.display_name = Some(display_name);
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    if let Some(password) = request.password {
        if password.is_empty() {
            return error_json(StatusCode::BAD_REQUEST, "password must not be empty");
        }
        user.password_hash = match hash_password(&password) {
            Ok(hash) => hash,
            Err(e) => return internal_error("password hashing failed", e),
        };
    }
    user.updated_at = chrono::Utc::now().to_rfc3339();

    match state.db.update_user(&user).await {
        Ok(()) => Json(UserResponse::from(user)).into_response(),
        Err(e) => internal_error("user update failed", e),
    }
}

/// `DELETE /api/v1/users/:id`
pub async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.db.delete_user(&id).await {
        Ok(0) => error_json(StatusCode::NOT_FOUND, format!("User not found: {id}")),
        Ok(_) => {
            // Any sessions for the deleted user die with it
            state
                .sessions
                .write()
                .await
                .retain(|_, user_id| *user_id != id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("user delete failed", e),
    }
}
