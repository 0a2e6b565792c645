// ABOUTME: Storage operations for login sessions
// ABOUTME: Token generation, hashing, verification, and expiry handling

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use reqtrack_storage::{generate_id, StorageError};

use crate::types::{Session, SessionGeneration};

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        hex::encode(result)
    }

    /// Verify a token against a stored hash using constant-time comparison
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        let computed_hash = Self::hash_token(token);

        use subtle::ConstantTimeEq;
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a session for a user, valid for `ttl` from now
    pub async fn create_session(
        &self,
        user_id: &str,
        ttl: Duration,
    ) -> Result<SessionGeneration, StorageError> {
        let id = generate_id();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let created_at = Utc::now();
        let expires_at = created_at + ttl;

        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&token_hash)
        .bind(created_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        debug!("Created session {} for user {}", id, user_id);

        let session = Session {
            id,
            user_id: user_id.to_string(),
            token_hash,
            created_at,
            expires_at,
        };

        Ok(SessionGeneration::new(token, session))
    }

    /// Verify a bearer token and return the session if valid and unexpired
    pub async fn verify_token(&self, token: &str) -> Result<Option<Session>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(
            "SELECT id, user_id, token_hash, created_at, expires_at
             FROM sessions
             WHERE token_hash = ?",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let stored_hash: String = row.try_get("token_hash").map_err(StorageError::Sqlx)?;

        // Double-check with constant-time comparison
        if !Self::verify_token_hash(token, &stored_hash) {
            return Ok(None);
        }

        let session = Self::row_to_session(row)?;

        if session.is_expired(Utc::now()) {
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Delete sessions whose expiry is in the past
    pub async fn prune_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    fn row_to_session(row: sqlx::sqlite::SqliteRow) -> Result<Session, StorageError> {
        Ok(Session {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            token_hash: row.try_get("token_hash").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            expires_at: row.try_get("expires_at").map_err(StorageError::Sqlx)?,
        })
    }
}
