// ABOUTME: Project storage layer using SQLite
// ABOUTME: Scoped listing, membership mutation, and transactional cascade delete

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use reqtrack_storage::{generate_id, StorageError};

use crate::types::{NewProject, Project, ProjectMember, ProjectScope};

pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_project(&self, input: NewProject) -> Result<Project, StorageError> {
        debug!("Creating project: {}", input.name);

        let project = Project {
            id: generate_id(),
            name: input.name,
            description: input.description,
            owner_id: input.owner_id,
            owner_name: input.owner_name,
            members: Vec::new(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO projects (id, name, description, owner_id, owner_name, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.owner_id)
        .bind(&project.owner_name)
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(project)
    }

    pub async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>, StorageError> {
        let row = sqlx::query(
            "SELECT id, name, description, owner_id, owner_name, created_at
             FROM projects WHERE id = ?",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let members = self.member_ids(project_id).await?;
        Ok(Some(Self::row_to_project(row, members)?))
    }

    /// List the projects visible inside a caller's scope
    pub async fn list(&self, scope: &ProjectScope) -> Result<Vec<Project>, StorageError> {
        let rows = match scope {
            ProjectScope::All => {
                sqlx::query(
                    "SELECT id, name, description, owner_id, owner_name, created_at
                     FROM projects ORDER BY created_at",
                )
                .fetch_all(&self.pool)
                .await
            }
            ProjectScope::OwnedBy(owner_id) => {
                sqlx::query(
                    "SELECT id, name, description, owner_id, owner_name, created_at
                     FROM projects WHERE owner_id = ? ORDER BY created_at",
                )
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await
            }
            ProjectScope::MemberOf(user_id) => {
                sqlx::query(
                    "SELECT p.id, p.name, p.description, p.owner_id, p.owner_name, p.created_at
                     FROM projects p
                     JOIN project_members pm ON pm.project_id = p.id
                     WHERE pm.user_id = ?
                     ORDER BY p.created_at",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id").map_err(StorageError::Sqlx)?;
            let members = self.member_ids(&id).await?;
            projects.push(Self::row_to_project(row, members)?);
        }

        Ok(projects)
    }

    /// Member ids for a project
    pub async fn member_ids(&self, project_id: &str) -> Result<Vec<String>, StorageError> {
        let ids = sqlx::query_scalar(
            "SELECT user_id FROM project_members WHERE project_id = ? ORDER BY added_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(ids)
    }

    /// Members expanded to display fields for listings
    pub async fn members_detailed(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectMember>, StorageError> {
        let rows = sqlx::query(
            "SELECT u.id, u.name, u.email
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             WHERE pm.project_id = ?
             ORDER BY pm.added_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.into_iter()
            .map(|row| {
                Ok(ProjectMember {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    name: row.try_get("name").map_err(StorageError::Sqlx)?,
                    email: row.try_get("email").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }

    /// Add a user to the member set.
    ///
    /// The conditional insert is atomic: when two concurrent adds race, the
    /// second one observes zero affected rows and reports AlreadyMember.
    pub async fn add_member(&self, project_id: &str, user_id: &str) -> Result<(), StorageError> {
        debug!("Adding member {} to project {}", user_id, project_id);

        let result = sqlx::query(
            "INSERT OR IGNORE INTO project_members (project_id, user_id, added_at)
             VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::AlreadyMember);
        }

        Ok(())
    }

    /// Remove a user from the member set; NotMember when they were absent
    pub async fn remove_member(&self, project_id: &str, user_id: &str) -> Result<(), StorageError> {
        debug!("Removing member {} from project {}", user_id, project_id);

        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotMember);
        }

        Ok(())
    }

    /// Delete a project together with its member set and every requirement
    /// that references it. One transaction, so readers never observe orphaned
    /// requirements.
    pub async fn delete_project(&self, project_id: &str) -> Result<bool, StorageError> {
        debug!("Deleting project {} with cascade", project_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM requirements WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM project_members WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_project(
        row: sqlx::sqlite::SqliteRow,
        members: Vec<String>,
    ) -> Result<Project, StorageError> {
        Ok(Project {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            description: row.try_get("description").map_err(StorageError::Sqlx)?,
            owner_id: row.try_get("owner_id").map_err(StorageError::Sqlx)?,
            owner_name: row.try_get("owner_name").map_err(StorageError::Sqlx)?,
            members,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        })
    }
}
