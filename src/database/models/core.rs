//! Core Entity Records
//!
//! Database records for user accounts and per-user scene viewport state.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// User Record
// ============================================================================

/// User account database record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub role: String, // "admin", "gamemaster", "player"
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    pub fn new(username: String, password_hash: String, role: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            display_name: None,
            password_hash,
            role,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// ============================================================================
// Viewport Record
// ============================================================================

/// Saved camera position for one (user, scene) pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ViewportRecord {
    pub id: String,
    pub user_id: String,
    pub scene_id: String,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub updated_at: String,
}

impl ViewportRecord {
    pub fn new(user_id: String, scene_id: String, x: f64, y: f64, zoom: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            scene_id,
            x,
            y,
            zoom,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
