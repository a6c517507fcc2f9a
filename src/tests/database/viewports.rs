//! Viewport Database Tests
//!
//! Tests for upsert-by-key viewport persistence.

use crate::database::models::ViewportRecord;
use crate::database::users::UserOps;
use crate::database::viewports::ViewportOps;
use crate::tests::common::{create_test_db, create_test_user};

#[tokio::test]
async fn test_save_and_get_viewport() {
    let (db, _temp) = create_test_db().await;
    let user = create_test_user(&db, "gm", "pass").await;

    let viewport = ViewportRecord::new(user.id.clone(), "scene-1".to_string(), 100.0, 200.0, 1.5);
    db.save_viewport(&viewport).await.expect("Failed to save");

    let retrieved = db
        .get_viewport(&user.id, "scene-1")
        .await
        .expect("Failed to get viewport")
        .expect("Viewport not found");
    assert_eq!(retrieved.x, 100.0);
    assert_eq!(retrieved.y, 200.0);
    assert_eq!(retrieved.zoom, 1.5);
}

#[tokio::test]
async fn test_get_unsaved_viewport_is_none() {
    let (db, _temp) = create_test_db().await;
    let user = create_test_user(&db, "gm", "pass").await;

    let result = db
        .get_viewport(&user.id, "never-visited")
        .await
        .expect("Failed to query viewport");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_second_save_overwrites_same_scene() {
    let (db, _temp) = create_test_db().await;
    let user = create_test_user(&db, "gm", "pass").await;

    let first = ViewportRecord::new(user.id.clone(), "scene-1".to_string(), 0.0, 0.0, 1.0);
    db.save_viewport(&first).await.expect("Failed to save");

    let second = ViewportRecord::new(user.id.clone(), "scene-1".to_string(), 50.0, -25.0, 2.0);
    db.save_viewport(&second).await.expect("Failed to save");

    let retrieved = db
        .get_viewport(&user.id, "scene-1")
        .await
        .expect("Failed to get viewport")
        .expect("Viewport not found");

    // Position updated, original row identity kept
    assert_eq!(retrieved.x, 50.0);
    assert_eq!(retrieved.zoom, 2.0);
    assert_eq!(retrieved.id, first.id);

    let all = db.list_user_viewports(&user.id).await.unwrap();
    assert_eq!(all.len(), 1, "Upsert must not create a second row");
}

#[tokio::test]
async fn test_viewports_are_scoped_per_scene_and_user() {
    let (db, _temp) = create_test_db().await;
    let gm = create_test_user(&db, "gm", "pass").await;
    let player = create_test_user(&db, "player", "pass").await;

    let a = ViewportRecord::new(gm.id.clone(), "scene-1".to_string(), 1.0, 1.0, 1.0);
    let b = ViewportRecord::new(gm.id.clone(), "scene-2".to_string(), 2.0, 2.0, 1.0);
    let c = ViewportRecord::new(player.id.clone(), "scene-1".to_string(), 3.0, 3.0, 1.0);
    for viewport in [&a, &b, &c] {
        db.save_viewport(viewport).await.expect("Failed to save");
    }

    assert_eq!(db.list_user_viewports(&gm.id).await.unwrap().len(), 2);
    let theirs = db.get_viewport(&player.id, "scene-1").await.unwrap().unwrap();
    assert_eq!(theirs.x, 3.0);
}

#[tokio::test]
async fn test_delete_user_drops_viewports() {
    let (db, _temp) = create_test_db().await;
    let user = create_test_user(&db, "gm", "pass").await;

    let viewport = ViewportRecord::new(user.id.clone(), "scene-1".to_string(), 0.0, 0.0, 1.0);
    db.save_viewport(&viewport).await.expect("Failed to save");

    db.delete_user(&user.id).await.expect("Failed to delete");
    assert!(db.get_viewport(&user.id, "scene-1").await.unwrap().is_none());
}
