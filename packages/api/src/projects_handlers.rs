// ABOUTME: HTTP request handlers for projects and membership
// ABOUTME: Listing is scope-filtered per caller; mutation is owner-or-admin

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use reqtrack_access::{can_create_project, can_manage_project, project_scope};
use reqtrack_projects::{NewProject, Project, ProjectMember};
use reqtrack_users::AccountStatus;

use crate::auth::CurrentUser;
use crate::error::{authorize, ApiError};
use crate::state::AppState;

/// A project with its member set expanded to display fields
#[derive(Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner_name: String,
    pub members: Vec<ProjectMember>,
    pub created_at: DateTime<Utc>,
}

impl ProjectResponse {
    fn from_project(project: Project, members: Vec<ProjectMember>) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            owner_id: project.owner_id,
            owner_name: project.owner_name,
            members,
            created_at: project.created_at,
        }
    }
}

/// List the projects visible to the caller, with members expanded
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let scope = project_scope(&user);
    let projects = state.project_storage.list(&scope).await?;

    let mut responses = Vec::with_capacity(projects.len());
    for project in projects {
        let members = state.project_storage.members_detailed(&project.id).await?;
        responses.push(ProjectResponse::from_project(project, members));
    }

    Ok(Json(responses))
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
}

/// Create a project; the caller becomes its owner
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<Value>, ApiError> {
    authorize(can_create_project(&user))?;

    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Project name is required".to_string()));
    }

    info!("User {} creating project '{}'", user.id, name);

    let project = state
        .project_storage
        .insert_project(NewProject {
            name,
            description: request.description,
            owner_id: user.id,
            owner_name: user.name,
        })
        .await?;

    Ok(Json(json!({
        "message": "Project created",
        "project": ProjectResponse::from_project(project, Vec::new()),
    })))
}

/// Delete a project and every requirement that references it
pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let project = state
        .project_storage
        .find_by_id(&project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    authorize(can_manage_project(&user, &project))?;

    info!("User {} deleting project {}", user.id, project_id);

    state.project_storage.delete_project(&project_id).await?;

    Ok(Json(json!({
        "message": "Project deleted",
    })))
}

#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

/// Add an active user to the project's member set
pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<Value>, ApiError> {
    let project = state
        .project_storage
        .find_by_id(&project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    authorize(can_manage_project(&user, &project))?;

    let target = state
        .user_storage
        .find_by_id(&request.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if target.status != AccountStatus::Active {
        return Err(ApiError::Validation("User is not active".to_string()));
    }

    info!("Adding {} to project {}", target.id, project_id);

    state
        .project_storage
        .add_member(&project_id, &target.id)
        .await?;

    Ok(Json(json!({
        "message": format!("User {} added to project", target.name),
    })))
}

/// Remove a user from the project's member set
pub async fn remove_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((project_id, user_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let project = state
        .project_storage
        .find_by_id(&project_id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    authorize(can_manage_project(&user, &project))?;

    info!("Removing {} from project {}", user_id, project_id);

    state
        .project_storage
        .remove_member(&project_id, &user_id)
        .await?;

    Ok(Json(json!({
        "message": "Member removed from project",
    })))
}
