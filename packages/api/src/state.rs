// ABOUTME: Shared application state for API handlers
// ABOUTME: Bundles the SQLite pool and per-domain storage layers

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;

use reqtrack_auth::SessionStorage;
use reqtrack_projects::ProjectStorage;
use reqtrack_requirements::RequirementStorage;
use reqtrack_storage::{reqtrack_dir, StorageError};
use reqtrack_users::UserStorage;

/// How long a login session stays valid by default
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub project_storage: Arc<ProjectStorage>,
    pub requirement_storage: Arc<RequirementStorage>,
    pub session_storage: Arc<SessionStorage>,
    pub session_ttl: Duration,
}

impl AppState {
    /// Create application state from a connected pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            project_storage: Arc::new(ProjectStorage::new(pool.clone())),
            requirement_storage: Arc::new(RequirementStorage::new(pool.clone())),
            session_storage: Arc::new(SessionStorage::new(pool.clone())),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            pool,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Initialize state against the default database location
    pub async fn init() -> Result<Self, StorageError> {
        Self::init_with_path(None).await
    }

    /// Initialize state with an optional custom database path
    pub async fn init_with_path(database_path: Option<PathBuf>) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(|| reqtrack_dir().join("reqtrack.db"));
        let pool = reqtrack_storage::connect(&database_path).await?;
        Ok(Self::new(pool))
    }
}
