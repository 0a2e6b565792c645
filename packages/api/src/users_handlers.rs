// ABOUTME: HTTP request handlers for user administration
// ABOUTME: Pending queue, approval with role assignment, and deactivation

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::info;

use reqtrack_users::{Role, User};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

/// List accounts awaiting approval (admin only)
pub async fn list_pending_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    current_user.require_admin()?;

    let users = state.user_storage.list_pending().await?;
    Ok(Json(users))
}

/// List all accounts (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    current_user.require_admin()?;

    let users = state.user_storage.list_all().await?;
    Ok(Json(users))
}

#[derive(Deserialize)]
pub struct ApproveRequest {
    pub role: String,
}

/// Approve an account and assign its role (admin only).
///
/// Approval always activates the account in the same update, so a role can
/// never end up on a non-active account through this path.
pub async fn approve_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<String>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<Value>, ApiError> {
    current_user.require_admin()?;

    let role = Role::from_str(&request.role).map_err(|_| {
        ApiError::Validation(format!(
            "Invalid role: {}. Must be one of: admin, product_owner, developer",
            request.role
        ))
    })?;

    if role == Role::Pending {
        return Err(ApiError::Validation(
            "Invalid role: pending. Must be one of: admin, product_owner, developer".to_string(),
        ));
    }

    info!("Approving user {} as {}", user_id, role);

    let updated = state.user_storage.approve(&user_id, role).await?;
    if !updated {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(json!({
        "message": "User approved and role assigned",
    })))
}

/// Deactivate an account (admin only)
pub async fn deactivate_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    current_user.require_admin()?;

    info!("Deactivating user {}", user_id);

    let updated = state.user_storage.deactivate(&user_id).await?;
    if !updated {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(json!({
        "message": "User deactivated",
    })))
}
