/// Task operations
///
/// Tasks have no owner of their own: every check resolves the owning
/// project's `owner_id`, either through a store lookup or from the
/// `owner_id` a cached projection carries. Single-task reads go through
/// the cache read-through path; list operations always bypass it.

use uuid::Uuid;

use crate::access::{policy, AccessService};
use crate::cache::task_key;
use crate::error::{AccessError, StoreError};
use crate::models::task::{CreateTask, Task, TaskFilter, TaskProjection, UpdateTask};
use crate::models::user::Actor;

impl AccessService {
    /// Resolves a task's owner through its project
    ///
    /// A dangling `project_id` cannot normally happen (foreign keys plus
    /// delete cascades), but if the store produces one it surfaces as
    /// NotFound on the project reference rather than a generic failure.
    async fn task_owner(&self, task: &Task) -> Result<Uuid, AccessError> {
        let project = self
            .store
            .get_project(task.project_id)
            .await?
            .ok_or(AccessError::NotFound("project"))?;
        Ok(project.owner_id)
    }

    /// Lists tasks visible to `actor`, paginated
    ///
    /// With a `project_id` filter the project must exist (NotFound) and the
    /// actor must pass the policy against it (Forbidden). Without one,
    /// admins see every task and other actors the tasks of projects they
    /// own: silently filtered, never denied.
    pub async fn list_tasks(
        &self,
        actor: &Actor,
        project_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AccessError> {
        let filter = match project_id {
            Some(pid) => {
                let project = self
                    .store
                    .get_project(pid)
                    .await?
                    .ok_or(AccessError::NotFound("project"))?;
                policy::require(actor, project.owner_id)?;
                TaskFilter {
                    project_id: Some(pid),
                    owner_id: None,
                }
            }
            None => TaskFilter {
                project_id: None,
                owner_id: if actor.role.is_admin() {
                    None
                } else {
                    Some(actor.id)
                },
            },
        };

        Ok(self.store.list_tasks(filter, skip, limit).await?)
    }

    /// Creates a task under an existing project
    ///
    /// The parent project is looked up first: absent → NotFound, present
    /// but not the actor's (and actor not admin) → Forbidden. The cache is
    /// not populated here; the first read does that lazily.
    pub async fn create_task(&self, actor: &Actor, data: CreateTask) -> Result<Task, AccessError> {
        let project = self
            .store
            .get_project(data.project_id)
            .await?
            .ok_or(AccessError::NotFound("project"))?;
        policy::require(actor, project.owner_id)?;

        // The project can vanish between the check above and the insert;
        // the store's foreign-key failure maps to the same NotFound.
        let task = match self.store.create_task(data).await {
            Ok(task) => task,
            Err(StoreError::ForeignKey { .. }) => return Err(AccessError::NotFound("project")),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(task_id = %task.id, project_id = %task.project_id, "task created");
        Ok(task)
    }

    /// Reads a single task, read-through cached
    ///
    /// Cache hit: the policy runs against the projection's embedded
    /// `owner_id` and the store is not consulted at all. Cache miss: the
    /// task is fetched, its owner resolved through the project, the policy
    /// applied, and the projection written back before returning.
    pub async fn get_task(&self, actor: &Actor, id: Uuid) -> Result<TaskProjection, AccessError> {
        let key = task_key(id);

        if let Some(cached) = self.cache_get::<TaskProjection>(&key).await {
            policy::require(actor, cached.owner_id)?;
            return Ok(cached);
        }

        let task = self
            .store
            .get_task(id)
            .await?
            .ok_or(AccessError::NotFound("task"))?;
        let owner_id = self.task_owner(&task).await?;
        policy::require(actor, owner_id)?;

        let projection = TaskProjection::new(task, owner_id);
        self.cache_put(&key, &projection).await;

        Ok(projection)
    }

    /// Applies a partial update to a task
    ///
    /// The cache entry is deleted after the store write commits
    /// (invalidate-on-write, not update-in-place), so the next read
    /// repopulates from current store state.
    pub async fn update_task(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: UpdateTask,
    ) -> Result<Task, AccessError> {
        let task = self
            .store
            .get_task(id)
            .await?
            .ok_or(AccessError::NotFound("task"))?;
        let owner_id = self.task_owner(&task).await?;
        policy::require(actor, owner_id)?;

        let updated = self
            .store
            .update_task(id, patch)
            .await?
            .ok_or(AccessError::NotFound("task"))?;

        self.cache_evict(&task_key(id)).await;

        tracing::info!(task_id = %id, "task updated");
        Ok(updated)
    }

    /// Deletes a task
    ///
    /// Store delete first, cache invalidation second, never the reverse:
    /// there must be no window where a task deleted from the store is
    /// still servable from a fresh cache entry written afterwards.
    pub async fn delete_task(&self, actor: &Actor, id: Uuid) -> Result<Task, AccessError> {
        let task = self
            .store
            .get_task(id)
            .await?
            .ok_or(AccessError::NotFound("task"))?;
        let owner_id = self.task_owner(&task).await?;
        policy::require(actor, owner_id)?;

        if !self.store.delete_task(id).await? {
            return Err(AccessError::NotFound("task"));
        }

        self.cache_evict(&task_key(id)).await;

        tracing::info!(task_id = %id, "task deleted");
        Ok(task)
    }
}
