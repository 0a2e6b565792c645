// ABOUTME: Tests for requirement storage layer
// ABOUTME: Verifies creation defaults, partial updates, and timestamp refresh

use chrono::Utc;
use sqlx::SqlitePool;

use crate::storage::RequirementStorage;
use crate::types::{NewRequirement, Priority, RequirementStatus, RequirementUpdateInput};

async fn setup_pool() -> SqlitePool {
    let pool = reqtrack_storage::connect_memory().await.unwrap();

    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, role, status, created_at)
         VALUES ('owner', 'owner@example.com', 'Owner', 'x', 'product_owner', 'active', ?)",
    )
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO projects (id, name, description, owner_id, owner_name, created_at)
         VALUES ('p1', 'Alpha', 'desc', 'owner', 'Owner', ?)",
    )
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    pool
}

fn new_requirement(title: &str) -> NewRequirement {
    NewRequirement {
        project_id: "p1".to_string(),
        title: title.to_string(),
        description: "details".to_string(),
        priority: Priority::High,
        created_by: "owner".to_string(),
        created_by_name: "Owner".to_string(),
    }
}

#[tokio::test]
async fn test_create_starts_as_draft() {
    let storage = RequirementStorage::new(setup_pool().await);

    let requirement = storage
        .insert_requirement(new_requirement("Login page"))
        .await
        .unwrap();

    assert_eq!(requirement.status, RequirementStatus::Draft);
    assert_eq!(requirement.priority, Priority::High);
    assert_eq!(requirement.created_at, requirement.updated_at);

    let fetched = storage.find_by_id(&requirement.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Login page");
}

#[tokio::test]
async fn test_list_by_project() {
    let storage = RequirementStorage::new(setup_pool().await);

    storage
        .insert_requirement(new_requirement("First"))
        .await
        .unwrap();
    storage
        .insert_requirement(new_requirement("Second"))
        .await
        .unwrap();

    let listed = storage.list_by_project("p1").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "First");

    assert!(storage.list_by_project("p2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_update_touches_only_provided_fields() {
    let storage = RequirementStorage::new(setup_pool().await);
    let requirement = storage
        .insert_requirement(new_requirement("Login page"))
        .await
        .unwrap();

    let input = RequirementUpdateInput {
        status: Some(RequirementStatus::InProgress),
        ..Default::default()
    };
    assert!(storage.update(&requirement.id, &input).await.unwrap());

    let fetched = storage.find_by_id(&requirement.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, RequirementStatus::InProgress);
    assert_eq!(fetched.title, "Login page");
    assert_eq!(fetched.priority, Priority::High);
    assert!(fetched.updated_at > fetched.created_at);
}

#[tokio::test]
async fn test_update_unknown_requirement_reports_missing() {
    let storage = RequirementStorage::new(setup_pool().await);

    let input = RequirementUpdateInput {
        title: Some("New title".to_string()),
        ..Default::default()
    };
    assert!(!storage.update("no-such-id", &input).await.unwrap());
}

#[tokio::test]
async fn test_delete() {
    let storage = RequirementStorage::new(setup_pool().await);
    let requirement = storage
        .insert_requirement(new_requirement("Login page"))
        .await
        .unwrap();

    assert!(storage.delete(&requirement.id).await.unwrap());
    assert!(storage.find_by_id(&requirement.id).await.unwrap().is_none());
    assert!(!storage.delete(&requirement.id).await.unwrap());
}

#[test]
fn test_empty_update_input_detected() {
    assert!(RequirementUpdateInput::default().is_empty());

    let input = RequirementUpdateInput {
        priority: Some(Priority::Low),
        ..Default::default()
    };
    assert!(!input.is_empty());
}
