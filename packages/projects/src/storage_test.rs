// ABOUTME: Tests for project storage layer
// ABOUTME: Verifies scoped listing, membership set semantics, and cascade delete

use chrono::Utc;
use sqlx::SqlitePool;

use crate::storage::ProjectStorage;
use crate::types::{NewProject, ProjectScope};
use reqtrack_storage::StorageError;

async fn setup_pool() -> SqlitePool {
    let pool = reqtrack_storage::connect_memory().await.unwrap();

    for (id, email, name, role) in [
        ("owner", "owner@example.com", "Owner", "product_owner"),
        ("dev", "dev@example.com", "Dev", "developer"),
        ("other", "other@example.com", "Other", "developer"),
    ] {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role, status, created_at)
             VALUES (?, ?, ?, 'x', ?, 'active', ?)",
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();
    }

    pool
}

fn new_project(name: &str, owner_id: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: "a project".to_string(),
        owner_id: owner_id.to_string(),
        owner_name: "Owner".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_fetch_project() {
    let storage = ProjectStorage::new(setup_pool().await);

    let project = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();

    let fetched = storage.find_by_id(&project.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Alpha");
    assert_eq!(fetched.owner_id, "owner");
    assert!(fetched.members.is_empty());
}

#[tokio::test]
async fn test_add_member_rejects_duplicates() {
    let storage = ProjectStorage::new(setup_pool().await);
    let project = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();

    storage.add_member(&project.id, "dev").await.unwrap();
    let err = storage.add_member(&project.id, "dev").await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyMember));

    // The set still contains the member exactly once
    let members = storage.member_ids(&project.id).await.unwrap();
    assert_eq!(members, vec!["dev".to_string()]);
}

#[tokio::test]
async fn test_remove_member_requires_membership() {
    let storage = ProjectStorage::new(setup_pool().await);
    let project = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();

    let err = storage.remove_member(&project.id, "dev").await.unwrap_err();
    assert!(matches!(err, StorageError::NotMember));

    storage.add_member(&project.id, "dev").await.unwrap();
    storage.remove_member(&project.id, "dev").await.unwrap();
    assert!(storage.member_ids(&project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_members_detailed_expands_display_fields() {
    let storage = ProjectStorage::new(setup_pool().await);
    let project = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();
    storage.add_member(&project.id, "dev").await.unwrap();

    let members = storage.members_detailed(&project.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, "dev");
    assert_eq!(members[0].name, "Dev");
    assert_eq!(members[0].email, "dev@example.com");
}

#[tokio::test]
async fn test_list_respects_scope() {
    let storage = ProjectStorage::new(setup_pool().await);

    let alpha = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();
    let beta = storage
        .insert_project(new_project("Beta", "other"))
        .await
        .unwrap();
    storage.add_member(&beta.id, "dev").await.unwrap();

    let all = storage.list(&ProjectScope::All).await.unwrap();
    assert_eq!(all.len(), 2);

    let owned = storage
        .list(&ProjectScope::OwnedBy("owner".to_string()))
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, alpha.id);

    let member_of = storage
        .list(&ProjectScope::MemberOf("dev".to_string()))
        .await
        .unwrap();
    assert_eq!(member_of.len(), 1);
    assert_eq!(member_of[0].id, beta.id);

    let none = storage
        .list(&ProjectScope::MemberOf("owner".to_string()))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_delete_project_cascades_requirements() {
    let pool = setup_pool().await;
    let storage = ProjectStorage::new(pool.clone());

    let project = storage
        .insert_project(new_project("Alpha", "owner"))
        .await
        .unwrap();
    storage.add_member(&project.id, "dev").await.unwrap();

    sqlx::query(
        "INSERT INTO requirements (id, project_id, title, description, priority, status, created_by, created_by_name, created_at, updated_at)
         VALUES ('r1', ?, 'Req', 'desc', 'high', 'draft', 'dev', 'Dev', ?, ?)",
    )
    .bind(&project.id)
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    assert!(storage.delete_project(&project.id).await.unwrap());

    assert!(storage.find_by_id(&project.id).await.unwrap().is_none());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requirements")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_members")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(memberships, 0);
}
