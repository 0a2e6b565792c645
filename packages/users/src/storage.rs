// ABOUTME: User storage layer using SQLite
// ABOUTME: Registration, approval, deactivation, and account lookups

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use reqtrack_storage::{generate_id, StorageError};

use crate::types::{AccountStatus, LoginRecord, NewUser, Role, User};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new account. New accounts always start with role and status
    /// `pending`; registration can never grant a privileged role directly.
    pub async fn insert_user(&self, input: NewUser) -> Result<User, StorageError> {
        debug!("Registering user: {}", input.email);

        let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(&input.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if existing.is_some() {
            return Err(StorageError::DuplicateEmail(input.email));
        }

        let user = User {
            id: generate_id(),
            email: input.email,
            name: input.name,
            role: Role::Pending,
            status: AccountStatus::Pending,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&input.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // The UNIQUE constraint catches the race between check and insert
            sqlx::Error::Database(db) if db.message().contains("UNIQUE") => {
                StorageError::DuplicateEmail(user.email.clone())
            }
            _ => StorageError::Sqlx(e),
        })?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(
            "SELECT id, email, name, role, status, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.map(Self::row_to_user).transpose()
    }

    /// Fetch the account and its password hash for credential verification
    pub async fn find_for_login(&self, email: &str) -> Result<Option<LoginRecord>, StorageError> {
        let row = sqlx::query(
            "SELECT id, email, name, role, status, created_at, password_hash
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let password_hash: String = row.try_get("password_hash").map_err(StorageError::Sqlx)?;
        let user = Self::row_to_user(row)?;

        Ok(Some(LoginRecord {
            user,
            password_hash,
        }))
    }

    pub async fn list_all(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, email, name, role, status, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    pub async fn list_pending(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, email, name, role, status, created_at
             FROM users WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    /// Assign a role and activate the account in one update.
    /// Returns false when no such user exists.
    pub async fn approve(&self, user_id: &str, role: Role) -> Result<bool, StorageError> {
        debug!("Approving user {} as {}", user_id, role);

        let result = sqlx::query("UPDATE users SET role = ?, status = 'active' WHERE id = ?")
            .bind(role.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark the account inactive. Returns false when no such user exists.
    pub async fn deactivate(&self, user_id: &str) -> Result<bool, StorageError> {
        debug!("Deactivating user {}", user_id);

        let result = sqlx::query("UPDATE users SET status = 'inactive' WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_user(row: sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        let role: String = row.try_get("role").map_err(StorageError::Sqlx)?;
        let status: String = row.try_get("status").map_err(StorageError::Sqlx)?;

        Ok(User {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            email: row.try_get("email").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            role: Role::from_str(&role).map_err(|e| StorageError::Decode(e.to_string()))?,
            status: AccountStatus::from_str(&status)
                .map_err(|e| StorageError::Decode(e.to_string()))?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        })
    }
}
