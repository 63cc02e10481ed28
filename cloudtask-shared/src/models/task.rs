/// Task model, cache projection, and database operations
///
/// Tasks belong to exactly one project and never store their own owner:
/// ownership is always resolved through the project's `owner_id`. The
/// [`TaskProjection`] type is the denormalized shape stored in the cache for
/// hot single-task lookups; it carries the owner id copied from the project
/// at the time of caching so permission checks on a cache hit need no store
/// round-trip.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Whether the task still needs work
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Done)
    }
}

/// Task within a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Owning project, immutable after creation
    pub project_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Denormalized task shape stored in the cache
///
/// Identical to [`Task`] plus the `owner_id` of the owning project, injected
/// at cache-population time. The projection is derived, non-authoritative
/// state: it may lag the store by up to one TTL interval or until the next
/// write, whichever comes first, and must never be used to decide whether a
/// task exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProjection {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Owning project
    pub project_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// Owner of the owning project at the time the projection was built
    pub owner_id: Uuid,
}

impl TaskProjection {
    /// Builds a projection from a task and its resolved owner
    pub fn new(task: Task, owner_id: Uuid) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            project_id: task.project_id,
            created_at: task.created_at,
            owner_id,
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status
    #[serde(default)]
    pub status: TaskStatus,

    /// Owning project; must reference an existing project
    pub project_id: Uuid,
}

/// Partial update for a task
///
/// Only fields that are `Some` are applied. `project_id` is immutable and
/// intentionally not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl UpdateTask {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Filter for task listings
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Restrict to tasks of this project
    pub project_id: Option<Uuid>,

    /// Restrict to tasks of projects owned by this user
    pub owner_id: Option<Uuid>,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if `project_id` does not reference
    /// an existing project.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, project_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, project_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, project_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks with pagination
    ///
    /// The owner filter joins through projects, so it matches tasks whose
    /// owning project belongs to the given user.
    pub async fn list(
        pool: &PgPool,
        filter: TaskFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.project_id, t.created_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE TRUE
            "#,
        );
        let mut bind_count = 0;

        if filter.project_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND t.project_id = ${}", bind_count));
        }
        if filter.owner_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND p.owner_id = ${}", bind_count));
        }

        query.push_str(&format!(
            " ORDER BY t.created_at DESC LIMIT ${} OFFSET ${}",
            bind_count + 1,
            bind_count + 2
        ));

        let mut q = sqlx::query_as::<_, Task>(&query);
        if let Some(project_id) = filter.project_id {
            q = q.bind(project_id);
        }
        if let Some(owner_id) = filter.owner_id {
            q = q.bind(owner_id);
        }
        let tasks = q.bind(limit).bind(skip).fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Returns the updated task, or `None` if the task does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: UpdateTask,
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
        if patch.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING id, title, description, status, project_id, created_at",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
