/// Project model and database operations
///
/// A project is the unit of ownership: it references exactly one owning
/// user, fixed at creation time, and contains zero or more tasks. Task
/// authorization always resolves through the owning project.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user, set at creation and immutable thereafter
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning user
    pub owner_id: Uuid,
}

/// Partial update for a project
///
/// Only fields that are `Some` are applied; absent fields are left
/// untouched. `owner_id` is immutable and intentionally not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl UpdateProject {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl Project {
    /// Creates a new project
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects with pagination, optionally filtered by owner
    pub async fn list(
        pool: &PgPool,
        owner_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = match owner_id {
            Some(owner) => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, title, description, owner_id, created_at
                    FROM projects
                    WHERE owner_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(owner)
                .bind(limit)
                .bind(skip)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, title, description, owner_id, created_at
                    FROM projects
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(skip)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(projects)
    }

    /// Applies a partial update
    ///
    /// Returns the updated project, or `None` if the project does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build the SET clause from whichever fields the patch carries.
        let mut sets = Vec::new();
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }

        let query = format!(
            "UPDATE projects SET {} WHERE id = $1 RETURNING id, title, description, owner_id, created_at",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project
    ///
    /// Cascades to the project's tasks. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_is_empty() {
        let patch = UpdateProject::default();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_project_with_field_is_not_empty() {
        let patch = UpdateProject {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
