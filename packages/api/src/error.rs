// ABOUTME: API error type and HTTP response mapping
// ABOUTME: Keeps authentication, permission, not-found, and validation outcomes distinct

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use reqtrack_access::Decision;
use reqtrack_storage::StorageError;

/// Error type returned by every API handler.
///
/// Authentication failures, inactive accounts, permission denials, missing
/// resources, and validation failures are separate variants and are never
/// conflated in responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Your account is pending approval")]
    PendingApproval,

    #[error("Your account is inactive")]
    Deactivated,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Internal server error")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("Email {} is already registered", email))
            }
            StorageError::AlreadyMember => {
                ApiError::Conflict("User is already a member of the project".to_string())
            }
            StorageError::NotMember => ApiError::NotFound("Member"),
            other => ApiError::Storage(other),
        }
    }
}

impl From<reqtrack_auth::PasswordError> for ApiError {
    fn from(err: reqtrack_auth::PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Turn an access decision into a handler result
pub fn authorize(decision: Decision) -> Result<(), ApiError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(ApiError::PermissionDenied(reason.to_string())),
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            ApiError::PendingApproval => (StatusCode::FORBIDDEN, "PENDING_APPROVAL"),
            ApiError::Deactivated => (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE"),
            ApiError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message; internal failures are not echoed to the caller
    fn to_user_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Internal(_) => {
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.to_status_and_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(request_id = %request_id, "Request failed: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code,
                message: self.to_user_message(),
            },
            request_id,
        };

        (status, ResponseJson(body)).into_response()
    }
}
