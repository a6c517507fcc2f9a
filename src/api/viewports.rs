//! Scene viewport route handlers
//!
//! Per-user camera state, keyed by (authenticated user, scene).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use super::auth::AuthUser;
use super::{error_json, internal_error, AppState};
use crate::database::models::ViewportRecord;
use crate::database::viewports::ViewportOps;

#[derive(Debug, Deserialize)]
pub struct SaveViewportRequest {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// `GET /api/v1/scenes/:scene_id/viewport`
pub async fn get_viewport(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(scene_id): Path<String>,
) -> Response {
    match state.db.get_viewport(&auth.user_id, &scene_id).await {
        Ok(Some(viewport)) => Json(viewport).into_response(),
        Ok(None) => error_json(
            StatusCode::NOT_FOUND,
            format!("No saved viewport for scene: {scene_id}"),
        ),
        Err(e) => internal_error("viewport lookup failed", e),
    }
}

/// `PUT /api/v1/scenes/:scene_id/viewport`
pub async fn save_viewport(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(scene_id): Path<String>,
    Json(request): Json<SaveViewportRequest>,
) -> Response {
    if !request.zoom.is_finite() || request.zoom <= 0.0 {
        return error_json(StatusCode::BAD_REQUEST, "zoom must be a positive number");
    }
    if !request.x.is_finite() || !request.y.is_finite() {
        return error_json(StatusCode::BAD_REQUEST, "x and y must be finite numbers");
    }

    let viewport = ViewportRecord::new(
        auth.user_id.clone(),
        scene_id,
        request.x,
        request.y,
        request.zoom,
    );

    if let Err(e) = state.db.save_viewport(&viewport).await {
        return internal_error("viewport save failed", e);
    }

    // Re-read the row: an update keeps the original row id, not the one
    // generated for this request.
    match state.db.get_viewport(&auth.user_id, &viewport.scene_id).await {
        Ok(Some(saved)) => Json(saved).into_response(),
        Ok(None) => internal_error("viewport readback failed", "row missing after upsert"),
        Err(e) => internal_error("viewport readback failed", e),
    }
}
