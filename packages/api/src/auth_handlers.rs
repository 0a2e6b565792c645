// ABOUTME: HTTP request handlers for registration, login, and identity
// ABOUTME: Registration always produces a pending account awaiting admin approval

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use reqtrack_auth::{hash_password, verify_password};
use reqtrack_users::{AccountStatus, NewUser, Role};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserSummary,
}

#[derive(Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Register a new account; it stays pending until an admin approves it
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = request.email.trim().to_string();
    let name = request.name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    info!("Registering new account: {}", email);

    let password_hash = hash_password(&request.password)?;
    let user = state
        .user_storage
        .insert_user(NewUser {
            email,
            name,
            password_hash,
        })
        .await?;

    Ok(Json(json!({
        "message": "Registration submitted. Await administrator approval.",
        "user_id": user.id,
    })))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let record = state
        .user_storage
        .find_for_login(&request.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&request.password, &record.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    match record.user.status {
        AccountStatus::Active => {}
        AccountStatus::Pending => return Err(ApiError::PendingApproval),
        AccountStatus::Inactive => return Err(ApiError::Deactivated),
    }

    state.session_storage.prune_expired().await?;

    let generation = state
        .session_storage
        .create_session(&record.user.id, state.session_ttl)
        .await?;

    info!("User {} logged in", record.user.id);

    Ok(Json(LoginResponse {
        access_token: generation.token,
        token_type: "bearer",
        user: UserSummary {
            id: record.user.id,
            email: record.user.email,
            name: record.user.name,
            role: record.user.role,
        },
    }))
}

/// Get current user info
pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "role": user.role,
        "status": user.status,
    }))
}
