/// PostgreSQL-backed store
///
/// Thin adapter between the [`Store`] trait and the model-level sqlx CRUD.
/// The only logic here is error translation: constraint violations become
/// the typed [`StoreError`] variants the access service understands.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::Store;

/// Store implementation over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for infrastructure code (migrations, health)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translates a sqlx error into a typed store error
///
/// `fk_reference` names the entity a foreign-key constraint on this query
/// points at; `unique_entity` the entity guarded by a unique constraint.
fn translate(
    err: sqlx::Error,
    fk_reference: Option<&'static str>,
    unique_entity: Option<&'static str>,
) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            if let Some(reference) = fk_reference {
                if constraint.contains("fkey") {
                    return StoreError::ForeignKey { reference };
                }
            }
            if let Some(entity) = unique_entity {
                if constraint.contains("key") || constraint.contains("unique") {
                    return StoreError::Conflict { entity };
                }
            }
        }
    }
    StoreError::from(err)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::pool::health_check(&self.pool)
            .await
            .map_err(StoreError::from)
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        User::create(&self.pool, data)
            .await
            .map_err(|e| translate(e, None, Some("user")))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError> {
        Project::create(&self.pool, data)
            .await
            .map_err(|e| translate(e, Some("user"), None))
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(
        &self,
        owner_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, StoreError> {
        Ok(Project::list(&self.pool, owner_id, skip, limit).await?)
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        Ok(Project::update(&self.pool, id, patch).await?)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Task::create(&self.pool, data)
            .await
            .map_err(|e| translate(e, Some("project"), None))
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(
        &self,
        filter: TaskFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list(&self.pool, filter, skip, limit).await?)
    }

    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&self.pool, id, patch).await?)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}
