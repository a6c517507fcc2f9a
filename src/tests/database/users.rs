//! User Database Tests
//!
//! Tests for user CRUD operations and the username uniqueness
//! constraint.

use crate::database::models::UserRecord;
use crate::database::users::UserOps;
use crate::tests::common::{create_test_db, create_test_user};

// =============================================================================
// Basic CRUD Tests
// =============================================================================

#[tokio::test]
async fn test_create_and_get_user() {
    let (db, _temp) = create_test_db().await;

    let user = create_test_user(&db, "aragorn", "ranger-pass").await;

    let retrieved = db
        .get_user(&user.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");

    assert_eq!(retrieved.id, user.id);
    assert_eq!(retrieved.username, "aragorn");
    assert_eq!(retrieved.role, "player");
}

#[tokio::test]
async fn test_get_user_by_username() {
    let (db, _temp) = create_test_db().await;

    create_test_user(&db, "gandalf", "secret").await;

    let retrieved = db
        .get_user_by_username("gandalf")
        .await
        .expect("Failed to query user")
        .expect("User not found");
    assert_eq!(retrieved.username, "gandalf");

    let missing = db
        .get_user_by_username("saruman")
        .await
        .expect("Failed to query user");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (db, _temp) = create_test_db().await;

    create_test_user(&db, "frodo", "one").await;

    let duplicate = UserRecord::new("frodo".to_string(), "hash".to_string(), "player".to_string());
    let result = db.create_user(&duplicate).await;
    assert!(result.is_err(), "UNIQUE constraint should reject duplicate");
}

#[tokio::test]
async fn test_update_user() {
    let (db, _temp) = create_test_db().await;

    let mut user = create_test_user(&db, "sam", "po-tay-toes").await;

    user.display_name = Some("Samwise Gamgee".to_string());
    user.role = "gamemaster".to_string();
    user.updated_at = chrono::Utc::now().to_rfc3339();

    db.update_user(&user).await.expect("Failed to update user");

    let retrieved = db
        .get_user(&user.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(retrieved.display_name, Some("Samwise Gamgee".to_string()));
    assert_eq!(retrieved.role, "gamemaster");
}

#[tokio::test]
async fn test_delete_user() {
    let (db, _temp) = create_test_db().await;

    let user = create_test_user(&db, "boromir", "horn").await;

    let deleted = db.delete_user(&user.id).await.expect("Failed to delete");
    assert_eq!(deleted, 1);
    assert!(db.get_user(&user.id).await.unwrap().is_none());

    // Deleting again is a no-op
    let deleted = db.delete_user(&user.id).await.expect("Failed to delete");
    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn test_list_and_count_users() {
    let (db, _temp) = create_test_db().await;

    assert_eq!(db.count_users().await.unwrap(), 0);

    create_test_user(&db, "charlie", "p").await;
    create_test_user(&db, "alice", "p").await;
    create_test_user(&db, "bob", "p").await;

    let users = db.list_users().await.expect("Failed to list users");
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "charlie"]);
    assert_eq!(db.count_users().await.unwrap(), 3);
}
