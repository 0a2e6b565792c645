// ABOUTME: Requirement storage layer using SQLite
// ABOUTME: Creation, listing, partial updates, and deletion

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use reqtrack_storage::{generate_id, StorageError};

use crate::types::{
    NewRequirement, Priority, Requirement, RequirementStatus, RequirementUpdateInput,
};

pub struct RequirementStorage {
    pool: SqlitePool,
}

impl RequirementStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_requirement(
        &self,
        input: NewRequirement,
    ) -> Result<Requirement, StorageError> {
        debug!(
            "Creating requirement '{}' in project {}",
            input.title, input.project_id
        );

        let now = Utc::now();
        let requirement = Requirement {
            id: generate_id(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            priority: input.priority,
            status: RequirementStatus::Draft,
            created_by: input.created_by,
            created_by_name: input.created_by_name,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO requirements
             (id, project_id, title, description, priority, status, created_by, created_by_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&requirement.id)
        .bind(&requirement.project_id)
        .bind(&requirement.title)
        .bind(&requirement.description)
        .bind(requirement.priority.as_str())
        .bind(requirement.status.as_str())
        .bind(&requirement.created_by)
        .bind(&requirement.created_by_name)
        .bind(requirement.created_at)
        .bind(requirement.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(requirement)
    }

    pub async fn find_by_id(
        &self,
        requirement_id: &str,
    ) -> Result<Option<Requirement>, StorageError> {
        let row = sqlx::query("SELECT * FROM requirements WHERE id = ?")
            .bind(requirement_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(Self::row_to_requirement).transpose()
    }

    pub async fn list_by_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<Requirement>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM requirements WHERE project_id = ? ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.into_iter().map(Self::row_to_requirement).collect()
    }

    /// Apply a partial update and refresh updated_at.
    ///
    /// Callers must skip empty inputs; this always writes the timestamp.
    /// Returns false when the requirement does not exist.
    pub async fn update(
        &self,
        requirement_id: &str,
        input: &RequirementUpdateInput,
    ) -> Result<bool, StorageError> {
        debug!("Updating requirement {}", requirement_id);

        let result = sqlx::query(
            "UPDATE requirements
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 priority = COALESCE(?, priority),
                 status = COALESCE(?, status),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority.map(|p| p.as_str()))
        .bind(input.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .bind(requirement_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one requirement. Returns false when it does not exist.
    pub async fn delete(&self, requirement_id: &str) -> Result<bool, StorageError> {
        debug!("Deleting requirement {}", requirement_id);

        let result = sqlx::query("DELETE FROM requirements WHERE id = ?")
            .bind(requirement_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_requirement(row: sqlx::sqlite::SqliteRow) -> Result<Requirement, StorageError> {
        let priority: String = row.try_get("priority").map_err(StorageError::Sqlx)?;
        let status: String = row.try_get("status").map_err(StorageError::Sqlx)?;

        Ok(Requirement {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
            title: row.try_get("title").map_err(StorageError::Sqlx)?,
            description: row.try_get("description").map_err(StorageError::Sqlx)?,
            priority: Priority::from_str(&priority)
                .map_err(|e| StorageError::Decode(e.to_string()))?,
            status: RequirementStatus::from_str(&status)
                .map_err(|e| StorageError::Decode(e.to_string()))?,
            created_by: row.try_get("created_by").map_err(StorageError::Sqlx)?,
            created_by_name: row.try_get("created_by_name").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}
