// ABOUTME: HTTP API layer for reqtrack providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub mod auth;
pub mod auth_handlers;
pub mod bootstrap;
pub mod error;
pub mod health_handlers;
pub mod projects_handlers;
pub mod requirements_handlers;
pub mod state;
pub mod users_handlers;

pub use error::ApiError;
pub use state::AppState;

/// Creates the auth API router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/me", get(auth_handlers::me))
}

/// Creates the user administration API router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users_handlers::list_users))
        .route("/pending", get(users_handlers::list_pending_users))
        .route("/{user_id}/approve", put(users_handlers::approve_user))
        .route(
            "/{user_id}/deactivate",
            put(users_handlers::deactivate_user),
        )
}

/// Creates the projects API router, including membership management
pub fn create_projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects_handlers::list_projects))
        .route("/", post(projects_handlers::create_project))
        .route("/{project_id}", delete(projects_handlers::delete_project))
        .route("/{project_id}/members", post(projects_handlers::add_member))
        .route(
            "/{project_id}/members/{user_id}",
            delete(projects_handlers::remove_member),
        )
}

/// Creates the requirements API router (nested under /api/projects/{project_id}/requirements)
pub fn create_requirements_router() -> Router<AppState> {
    Router::new()
        .route("/", get(requirements_handlers::list_requirements))
        .route("/", post(requirements_handlers::create_requirement))
        .route(
            "/{requirement_id}",
            put(requirements_handlers::update_requirement),
        )
        .route(
            "/{requirement_id}",
            delete(requirements_handlers::delete_requirement),
        )
}

/// Assemble the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(health_handlers::root))
        .route("/api/health", get(health_handlers::health_check))
        .nest("/api/auth", create_auth_router())
        .nest("/api/users", create_users_router())
        .nest("/api/projects", create_projects_router())
        .nest(
            "/api/projects/{project_id}/requirements",
            create_requirements_router(),
        )
        .with_state(state)
}
