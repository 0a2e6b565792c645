// ABOUTME: Startup provisioning for the initial administrator account
// ABOUTME: Without a seeded admin no registration could ever be approved

use tracing::info;

use reqtrack_auth::hash_password;
use reqtrack_users::{NewUser, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// Ensure an active administrator account exists.
///
/// Creates and activates the account on first run; on later runs the existing
/// account is left untouched, including a password changed since.
pub async fn ensure_admin(
    state: &AppState,
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), ApiError> {
    if state.user_storage.find_for_login(email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)?;
    let user = state
        .user_storage
        .insert_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
        })
        .await?;

    state.user_storage.approve(&user.id, Role::Admin).await?;

    info!("Seeded administrator account {}", email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqtrack_storage::connect_memory;

    #[tokio::test]
    async fn test_ensure_admin_creates_active_admin_once() {
        let pool = connect_memory().await.unwrap();
        let state = AppState::new(pool);

        ensure_admin(&state, "admin@example.com", "Admin", "secret")
            .await
            .unwrap();

        let record = state
            .user_storage
            .find_for_login("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.user.role, Role::Admin);
        let first_hash = record.password_hash.clone();

        // Second run is a no-op, even with a different password
        ensure_admin(&state, "admin@example.com", "Admin", "changed")
            .await
            .unwrap();

        let record = state
            .user_storage
            .find_for_login("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.password_hash, first_hash);
    }
}
