//! Scene viewport database operations
//!
//! This module provides upsert-by-key persistence for per-user scene
//! camera state.

use super::models::ViewportRecord;
use super::Database;

/// Extension trait for viewport database operations
pub trait ViewportOps {
    fn save_viewport(&self, viewport: &ViewportRecord) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_viewport(&self, user_id: &str, scene_id: &str) -> impl std::future::Future<Output = Result<Option<ViewportRecord>, sqlx::Error>> + Send;
    fn list_user_viewports(&self, user_id: &str) -> impl std::future::Future<Output = Result<Vec<ViewportRecord>, sqlx::Error>> + Send;
    fn delete_viewport(&self, user_id: &str, scene_id: &str) -> impl std::future::Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl ViewportOps for Database {
    /// Upsert keyed on (user_id, scene_id): a second save for the same
    /// pair overwrites the position and keeps the original row id.
    async fn save_viewport(&self, viewport: &ViewportRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO scene_viewports (id, user_id, scene_id, x, y, zoom, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, scene_id) DO UPDATE
            SET x = excluded.x, y = excluded.y, zoom = excluded.zoom, updated_at = excluded.updated_at
            "#,
        )
        .bind(&viewport.id)
        .bind(&viewport.user_id)
        .bind(&viewport.scene_id)
        .bind(viewport.x)
        .bind(viewport.y)
        .bind(viewport.zoom)
        .bind(&viewport.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_viewport(
        &self,
        user_id: &str,
        scene_id: &str,
    ) -> Result<Option<ViewportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ViewportRecord>(
            "SELECT * FROM scene_viewports WHERE user_id = ? AND scene_id = ?",
        )
        .bind(user_id)
        .bind(scene_id)
        .fetch_optional(self.pool())
        .await
    }

    async fn list_user_viewports(&self, user_id: &str) -> Result<Vec<ViewportRecord>, sqlx::Error> {
        sqlx::query_as::<_, ViewportRecord>(
            "SELECT * FROM scene_viewports WHERE user_id = ? ORDER BY scene_id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
    }

    async fn delete_viewport(&self, user_id: &str, scene_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scene_viewports WHERE user_id = ? AND scene_id = ?")
            .bind(user_id)
            .bind(scene_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
