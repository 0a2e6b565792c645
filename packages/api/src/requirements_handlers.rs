// ABOUTME: HTTP request handlers for requirements within a project
// ABOUTME: All operations are gated on the caller's access to the parent project

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::info;

use reqtrack_access::{can_access_requirements, can_delete_requirement};
use reqtrack_projects::Project;
use reqtrack_requirements::{
    NewRequirement, Priority, Requirement, RequirementStatus, RequirementUpdateInput,
};
use reqtrack_users::User;

use crate::auth::CurrentUser;
use crate::error::{authorize, ApiError};
use crate::state::AppState;

/// Load the project and verify the caller may touch its requirements
async fn load_accessible_project(
    state: &AppState,
    user: &User,
    project_id: &str,
) -> Result<Project, ApiError> {
    let project = state
        .project_storage
        .find_by_id(project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    authorize(can_access_requirements(user, &project))?;

    Ok(project)
}

fn parse_priority(raw: &str) -> Result<Priority, ApiError> {
    Priority::from_str(raw).map_err(|_| {
        ApiError::Validation(format!(
            "Invalid priority: {}. Must be one of: low, medium, high",
            raw
        ))
    })
}

fn parse_status(raw: &str) -> Result<RequirementStatus, ApiError> {
    RequirementStatus::from_str(raw).map_err(|_| {
        ApiError::Validation(format!(
            "Invalid status: {}. Must be one of: draft, approved, in_progress, completed",
            raw
        ))
    })
}

/// List the requirements of a project the caller can access
pub async fn list_requirements(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Requirement>>, ApiError> {
    load_accessible_project(&state, &user, &project_id).await?;

    let requirements = state
        .requirement_storage
        .list_by_project(&project_id)
        .await?;

    Ok(Json(requirements))
}

#[derive(Deserialize)]
pub struct CreateRequirementRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Create a requirement in a project the caller can access; new requirements
/// always start in draft
pub async fn create_requirement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
    Json(request): Json<CreateRequirementRequest>,
) -> Result<Json<Value>, ApiError> {
    load_accessible_project(&state, &user, &project_id).await?;

    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation(
            "Requirement title is required".to_string(),
        ));
    }

    let priority = match request.priority.as_deref() {
        Some(raw) => parse_priority(raw)?,
        None => Priority::default(),
    };

    info!("User {} creating requirement in project {}", user.id, project_id);

    let requirement = state
        .requirement_storage
        .insert_requirement(NewRequirement {
            project_id,
            title,
            description: request.description,
            priority,
            created_by: user.id,
            created_by_name: user.name,
        })
        .await?;

    Ok(Json(json!({
        "message": "Requirement created",
        "requirement": requirement,
    })))
}

#[derive(Deserialize)]
pub struct UpdateRequirementRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Partially update a requirement; omitted fields keep their stored values
pub async fn update_requirement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((project_id, requirement_id)): Path<(String, String)>,
    Json(request): Json<UpdateRequirementRequest>,
) -> Result<Json<Value>, ApiError> {
    load_accessible_project(&state, &user, &project_id).await?;

    let requirement = state
        .requirement_storage
        .find_by_id(&requirement_id)
        .await?
        .ok_or(ApiError::NotFound("Requirement"))?;

    if requirement.project_id != project_id {
        return Err(ApiError::NotFound("Requirement"));
    }

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(ApiError::Validation(
                "Requirement title cannot be empty".to_string(),
            ));
        }
    }

    let input = RequirementUpdateInput {
        title: request.title,
        description: request.description,
        priority: request.priority.as_deref().map(parse_priority).transpose()?,
        status: request.status.as_deref().map(parse_status).transpose()?,
    };

    // A zero-field update is a no-op: nothing is written and updated_at stays
    if input.is_empty() {
        return Ok(Json(json!({
            "message": "Requirement updated",
            "requirement": requirement,
        })));
    }

    let updated = state
        .requirement_storage
        .update(&requirement_id, &input)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Requirement"));
    }

    let requirement = state
        .requirement_storage
        .find_by_id(&requirement_id)
        .await?
        .ok_or(ApiError::NotFound("Requirement"))?;

    Ok(Json(json!({
        "message": "Requirement updated",
        "requirement": requirement,
    })))
}

/// Delete a requirement; developers are never allowed to, regardless of
/// membership
pub async fn delete_requirement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((project_id, requirement_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let project = state
        .project_storage
        .find_by_id(&project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    authorize(can_delete_requirement(&user, &project))?;

    let requirement = state
        .requirement_storage
        .find_by_id(&requirement_id)
        .await?
        .ok_or(ApiError::NotFound("Requirement"))?;

    if requirement.project_id != project_id {
        return Err(ApiError::NotFound("Requirement"));
    }

    info!("User {} deleting requirement {}", user.id, requirement_id);

    state.requirement_storage.delete(&requirement_id).await?;

    Ok(Json(json!({
        "message": "Requirement deleted",
    })))
}
