/// Project operations
///
/// Projects carry their owner directly, so every check runs against the
/// record's own `owner_id`. No cache layer is involved: project reads
/// always go to the store.

use uuid::Uuid;

use crate::access::{policy, AccessService};
use crate::error::AccessError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::user::Actor;

/// Caller-supplied fields for a new project
///
/// The owner is always the acting user; callers cannot create projects on
/// someone else's behalf.
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

impl AccessService {
    /// Lists projects visible to `actor`, paginated
    ///
    /// Admins see every project; other actors only their own. Never denies:
    /// an actor owning nothing gets an empty page.
    pub async fn list_projects(
        &self,
        actor: &Actor,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, AccessError> {
        let owner_filter = if actor.role.is_admin() {
            None
        } else {
            Some(actor.id)
        };
        Ok(self.store.list_projects(owner_filter, skip, limit).await?)
    }

    /// Creates a project owned by `actor`
    pub async fn create_project(
        &self,
        actor: &Actor,
        data: NewProject,
    ) -> Result<Project, AccessError> {
        let project = self
            .store
            .create_project(CreateProject {
                title: data.title,
                description: data.description,
                owner_id: actor.id,
            })
            .await?;

        tracing::info!(project_id = %project.id, owner_id = %actor.id, "project created");
        Ok(project)
    }

    /// Reads a single project
    pub async fn get_project(&self, actor: &Actor, id: Uuid) -> Result<Project, AccessError> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or(AccessError::NotFound("project"))?;
        policy::require(actor, project.owner_id)?;
        Ok(project)
    }

    /// Applies a partial update to a project
    pub async fn update_project(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Project, AccessError> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or(AccessError::NotFound("project"))?;
        policy::require(actor, project.owner_id)?;

        let updated = self
            .store
            .update_project(id, patch)
            .await?
            .ok_or(AccessError::NotFound("project"))?;

        tracing::info!(project_id = %id, "project updated");
        Ok(updated)
    }

    /// Deletes a project and, cascading, its tasks
    ///
    /// Returns the deleted record. Cache entries for cascaded tasks are not
    /// swept here; they age out within one TTL, the accepted staleness
    /// bound for derived state.
    pub async fn delete_project(&self, actor: &Actor, id: Uuid) -> Result<Project, AccessError> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or(AccessError::NotFound("project"))?;
        policy::require(actor, project.owner_id)?;

        if !self.store.delete_project(id).await? {
            return Err(AccessError::NotFound("project"));
        }

        tracing::info!(project_id = %id, "project deleted");
        Ok(project)
    }
}
