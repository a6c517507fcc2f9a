//! Compendium route handlers
//!
//! Read-only browsing over the system registry. These handlers own the
//! transport details (the `filter[field]=value` bracket syntax, status
//! mapping); all query evaluation lives in `core::query`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{error_json, AppState};
use crate::core::query::{self, QueryError, QueryParams};

/// `GET /api/v1/compendium/:system_id/types`
pub async fn list_types(
    State(state): State<Arc<AppState>>,
    Path(system_id): Path<String>,
) -> Response {
    match query::list_types(&state.registry, &system_id) {
        Ok(types) => Json(serde_json::json!({ "types": types })).into_response(),
        Err(e) => query_error_response(e),
    }
}

/// `GET /api/v1/compendium/:system_id/:content_type`
///
/// Query string: `search=`, repeatable `filter[field]=value`, `page=`,
/// `limit=`.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path((system_id, content_type)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = parse_query_params(pairs);
    match query::search(&state.registry, &system_id, &content_type, &params) {
        Ok(result) => Json(result).into_response(),
        Err(e) => query_error_response(e),
    }
}

/// `GET /api/v1/compendium/:system_id/:content_type/:entry_id`
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path((system_id, content_type, entry_id)): Path<(String, String, String)>,
) -> Response {
    match query::get_entry(&state.registry, &system_id, &content_type, &entry_id) {
        Ok(Some(entry)) => Json(serde_json::json!({ "entry": entry })).into_response(),
        Ok(None) => error_json(
            StatusCode::NOT_FOUND,
            format!("Entry not found: {entry_id}"),
        ),
        Err(e) => query_error_response(e),
    }
}

/// Fold raw query pairs into [`QueryParams`]. Repeated `filter[field]`
/// keys accumulate a value set for that field; unknown keys are ignored.
fn parse_query_params(pairs: Vec<(String, String)>) -> QueryParams {
    let mut params = QueryParams::default();
    for (key, value) in pairs {
        match key.as_str() {
            "search" => params.search = Some(value),
            "page" => params.page = Some(value),
            "limit" => params.limit = Some(value),
            _ => {
                if let Some(field) = key
                    .strip_prefix("filter[")
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    params
                        .filters
                        .entry(field.to_string())
                        .or_default()
                        .push(value);
                }
            }
        }
    }
    params
}

/// Map engine errors onto the HTTP surface: user input errors are 400,
/// an unknown system is 404.
fn query_error_response(error: QueryError) -> Response {
    let status = match &error {
        QueryError::SystemNotFound(_) => StatusCode::NOT_FOUND,
        QueryError::InvalidType { .. }
        | QueryError::InvalidPagination(_)
        | QueryError::InvalidLimit(_) => StatusCode::BAD_REQUEST,
    };
    error_json(status, error.to_string())
}
