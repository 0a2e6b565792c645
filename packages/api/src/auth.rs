// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves bearer tokens to active user accounts before any role logic

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use reqtrack_users::{AccountStatus, User};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated, active user making the current request.
///
/// Extraction fails with Unauthenticated when the token is missing, unknown,
/// or expired, and with PendingApproval/Deactivated when the account exists
/// but is not active. Role checks happen after this, never instead of it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied(
                "Administrator role is required".to_string(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let session = state
            .session_storage
            .verify_token(token)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        let user = state
            .user_storage
            .find_by_id(&session.user_id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        match user.status {
            AccountStatus::Active => Ok(CurrentUser(user)),
            AccountStatus::Pending => Err(ApiError::PendingApproval),
            AccountStatus::Inactive => Err(ApiError::Deactivated),
        }
    }
}
