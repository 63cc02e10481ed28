/// Durable storage seam
///
/// The [`Store`] trait is the single source of truth for users, projects,
/// and tasks. It is a dumb, trusted persistence layer: no authorization
/// logic lives here, and absence of a record is reported as `Ok(None)` /
/// `Ok(false)` rather than as an error; the access service decides what
/// absence means for the caller.
///
/// Two implementations ship:
///
/// - [`PgStore`]: PostgreSQL via sqlx, delegating to the model-level CRUD
///   in [`crate::models`]. The production backend.
/// - [`MemoryStore`]: HashMaps behind an async RwLock, used by tests and
///   anywhere a live database is unwanted.
///
/// The access service receives the store as `Arc<dyn Store>`, injected at
/// construction; there is no global connection state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// CRUD over users, projects, and tasks with foreign-key integrity
///
/// A task's `project_id` must reference an existing project and a project's
/// `owner_id` an existing user; violations surface as
/// [`StoreError::ForeignKey`]. Patches are partial: fields absent from the
/// patch are left untouched.
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    // --- users ---

    /// Creates a user; fails with [`StoreError::Conflict`] on duplicate email
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Looks up a user by ID
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Looks up a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // --- projects ---

    /// Creates a project owned by `data.owner_id`
    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError>;

    /// Looks up a project by ID
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Lists projects, optionally restricted to one owner
    async fn list_projects(
        &self,
        owner_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, StoreError>;

    /// Applies a partial update; `None` if the project does not exist
    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Deletes a project (and, cascading, its tasks); `false` if absent
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- tasks ---

    /// Creates a task under `data.project_id`
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Looks up a task by ID
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Lists tasks matching the filter
    async fn list_tasks(
        &self,
        filter: TaskFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError>;

    /// Applies a partial update; `None` if the task does not exist
    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError>;

    /// Deletes a task; `false` if absent
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}
