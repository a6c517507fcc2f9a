//! Test Fixtures
//!
//! Shared helpers for creating scratch databases, users, and seeded
//! system registries.

use tempfile::TempDir;

use crate::api::auth::hash_password;
use crate::core::registry::{GameSystem, SystemRegistry};
use crate::core::types::ContentType;
use crate::database::models::UserRecord;
use crate::database::users::UserOps;
use crate::database::Database;

// =============================================================================
// Database Fixtures
// =============================================================================

/// Create a test database in a temporary directory.
/// Returns both the database and the TempDir (which must be kept alive).
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(temp_dir.path())
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

/// Create and persist a user with a real argon2 hash.
pub async fn create_test_user(db: &Database, username: &str, password: &str) -> UserRecord {
    let hash = hash_password(password).expect("Failed to hash password");
    let user = UserRecord::new(username.to_string(), hash, "player".to_string());
    db.create_user(&user).await.expect("Failed to create user");
    user
}

// =============================================================================
// Registry Fixtures
// =============================================================================

/// A registry with `count` items carrying zero-padded ids, for
/// pagination tests that need a known ordered population.
pub fn numbered_registry(count: usize) -> SystemRegistry {
    let mut system = GameSystem::new("test", "Test System");
    for i in 0..count {
        system.insert_entry(
            ContentType::Items,
            format!("item-{i:04}"),
            serde_json::json!({"name": format!("Item {i}"), "index": i}),
        );
    }
    SystemRegistry::from_systems([system])
}
