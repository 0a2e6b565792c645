// ABOUTME: Database connection management and shared storage errors
// ABOUTME: Provides SQLite pool initialization, migrations, and id generation

use std::path::{Path, PathBuf};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// Embedded sqlx migrations, shared with package test suites.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Invalid stored value: {0}")]
    Decode(String),
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),
    #[error("User is already a member of the project")]
    AlreadyMember,
    #[error("User is not a member of the project")]
    NotMember,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Default data directory for the reqtrack database
pub fn reqtrack_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".reqtrack")
}

/// Generate a unique record ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Open the SQLite database at `database_path`, apply PRAGMAs, and run migrations
pub async fn connect(database_path: &Path) -> StorageResult<SqlitePool> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    let database_url = format!("sqlite:{}?mode=rwc", database_path.display());

    debug!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    MIGRATOR.run(&pool).await.map_err(StorageError::Migration)?;

    debug!("Database migrations completed");

    Ok(pool)
}

/// Open an in-memory database with the full schema applied.
///
/// Used by test suites across the workspace. The pool is pinned to a single
/// connection that never expires, since every connection to `:memory:` gets
/// its own database.
pub async fn connect_memory() -> StorageResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(StorageError::Sqlx)?;

    MIGRATOR.run(&pool).await.map_err(StorageError::Migration)?;

    Ok(pool)
}
