// ABOUTME: Tests for user storage layer
// ABOUTME: Verifies registration, approval, and deactivation lifecycle

use crate::storage::UserStorage;
use crate::types::{AccountStatus, NewUser, Role};
use reqtrack_storage::StorageError;

async fn setup_storage() -> UserStorage {
    let pool = reqtrack_storage::connect_memory().await.unwrap();
    UserStorage::new(pool)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: "argon2-hash".to_string(),
    }
}

#[tokio::test]
async fn test_registration_starts_pending() {
    let storage = setup_storage().await;

    let user = storage.insert_user(new_user("a@example.com")).await.unwrap();

    assert_eq!(user.role, Role::Pending);
    assert_eq!(user.status, AccountStatus::Pending);

    let fetched = storage.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, "a@example.com");
    assert_eq!(fetched.status, AccountStatus::Pending);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let storage = setup_storage().await;

    storage.insert_user(new_user("a@example.com")).await.unwrap();
    let err = storage
        .insert_user(new_user("a@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_approve_sets_role_and_activates() {
    let storage = setup_storage().await;

    let user = storage.insert_user(new_user("a@example.com")).await.unwrap();
    let updated = storage.approve(&user.id, Role::Developer).await.unwrap();
    assert!(updated);

    let fetched = storage.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.role, Role::Developer);
    assert_eq!(fetched.status, AccountStatus::Active);
}

#[tokio::test]
async fn test_approve_unknown_user_reports_missing() {
    let storage = setup_storage().await;

    let updated = storage.approve("no-such-id", Role::Developer).await.unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn test_deactivate() {
    let storage = setup_storage().await;

    let user = storage.insert_user(new_user("a@example.com")).await.unwrap();
    storage.approve(&user.id, Role::Developer).await.unwrap();
    assert!(storage.deactivate(&user.id).await.unwrap());

    let fetched = storage.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, AccountStatus::Inactive);
    // Deactivation leaves the assigned role in place
    assert_eq!(fetched.role, Role::Developer);
}

#[tokio::test]
async fn test_list_pending_filters_by_status() {
    let storage = setup_storage().await;

    let a = storage.insert_user(new_user("a@example.com")).await.unwrap();
    let b = storage.insert_user(new_user("b@example.com")).await.unwrap();
    storage.approve(&a.id, Role::ProductOwner).await.unwrap();

    let pending = storage.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, b.id);

    let all = storage.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_find_for_login_exposes_hash() {
    let storage = setup_storage().await;

    storage.insert_user(new_user("a@example.com")).await.unwrap();

    let record = storage
        .find_for_login("a@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.password_hash, "argon2-hash");
    assert_eq!(record.user.email, "a@example.com");

    assert!(storage
        .find_for_login("missing@example.com")
        .await
        .unwrap()
        .is_none());
}
