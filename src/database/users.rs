//! User database operations
//!
//! This module provides CRUD operations for user accounts.

use super::models::UserRecord;
use super::Database;

/// Extension trait for user-related database operations
pub trait UserOps {
    fn create_user(&self, user: &UserRecord) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_user(&self, id: &str) -> impl std::future::Future<Output = Result<Option<UserRecord>, sqlx::Error>> + Send;
    fn get_user_by_username(&self, username: &str) -> impl std::future::Future<Output = Result<Option<UserRecord>, sqlx::Error>> + Send;
    fn list_users(&self) -> impl std::future::Future<Output = Result<Vec<UserRecord>, sqlx::Error>> + Send;
    fn count_users(&self) -> impl std::future::Future<Output = Result<i64, sqlx::Error>> + Send;
    fn update_user(&self, user: &UserRecord) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn delete_user(&self, id: &str) -> impl std::future::Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl UserOps for Database {
    async fn create_user(&self, user: &UserRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, display_name, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY username")
            .fetch_all(self.pool())
            .await
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }

    async fn update_user(&self, user: &UserRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, display_name = ?, password_hash = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.updated_at)
        .bind(&user.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<u64, sqlx::Error> {
        // Viewports belong to the user; drop them in the same transaction
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM scene_viewports WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
