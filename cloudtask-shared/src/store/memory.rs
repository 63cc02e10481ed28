/// In-memory store
///
/// HashMap-backed [`Store`] implementation with the same contract as
/// [`crate::store::PgStore`], including foreign-key and uniqueness checks.
/// Used by the behavior tests and by API tests that should not need a live
/// database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

/// Store implementation over process-local HashMaps
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(mut items: Vec<T>, skip: i64, limit: i64) -> Vec<T> {
    let skip = skip.max(0) as usize;
    let limit = limit.max(0) as usize;
    if skip >= items.len() {
        return Vec::new();
    }
    items.drain(..skip);
    items.truncate(limit);
    items
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict { entity: "user" });
        }
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            full_name: data.full_name,
            password_hash: data.password_hash,
            role: data.role,
            is_active: true,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_project(&self, data: CreateProject) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&data.owner_id) {
            return Err(StoreError::ForeignKey { reference: "user" });
        }
        let project = Project {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(
        &self,
        owner_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.read().await;
        let mut projects: Vec<Project> = inner
            .projects
            .values()
            .filter(|p| owner_id.map_or(true, |owner| p.owner_id == owner))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(projects, skip, limit))
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(project) = inner.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.projects.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE CASCADE
        inner.tasks.retain(|_, t| t.project_id != id);
        Ok(true)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&data.project_id) {
            return Err(StoreError::ForeignKey {
                reference: "project",
            });
        }
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            project_id: data.project_id,
            created_at: Utc::now(),
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(
        &self,
        filter: TaskFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| filter.project_id.map_or(true, |p| t.project_id == p))
            .filter(|t| {
                filter.owner_id.map_or(true, |owner| {
                    inner
                        .projects
                        .get(&t.project_id)
                        .map_or(false, |p| p.owner_id == owner)
                })
            })
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(tasks, skip, limit))
    }

    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(task) = inner.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(CreateUser {
                email: email.to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        seed_user(&store, "dup@example.com").await;

        let err = store
            .create_user(CreateUser {
                email: "dup@example.com".to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "user" }));
    }

    #[tokio::test]
    async fn test_task_requires_existing_project() {
        let store = MemoryStore::new();
        let err = store
            .create_task(CreateTask {
                title: "orphan".to_string(),
                description: None,
                status: Default::default(),
                project_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { .. }));
    }

    #[tokio::test]
    async fn test_project_delete_cascades_to_tasks() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "owner@example.com").await;
        let project = store
            .create_project(CreateProject {
                title: "P".to_string(),
                description: None,
                owner_id: user.id,
            })
            .await
            .unwrap();
        let task = store
            .create_task(CreateTask {
                title: "T".to_string(),
                description: None,
                status: Default::default(),
                project_id: project.id,
            })
            .await
            .unwrap();

        assert!(store.delete_project(project.id).await.unwrap());
        assert!(store.get_task(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update_leaves_absent_fields() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "owner@example.com").await;
        let project = store
            .create_project(CreateProject {
                title: "P".to_string(),
                description: Some("keep me".to_string()),
                owner_id: user.id,
            })
            .await
            .unwrap();

        let updated = store
            .update_project(
                project.id,
                UpdateProject {
                    title: Some("P2".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "P2");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "owner@example.com").await;
        for i in 0..5 {
            store
                .create_project(CreateProject {
                    title: format!("P{}", i),
                    description: None,
                    owner_id: user.id,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.list_projects(None, 0, 3).await.unwrap().len(), 3);
        assert_eq!(store.list_projects(None, 4, 10).await.unwrap().len(), 1);
        assert_eq!(store.list_projects(None, 10, 10).await.unwrap().len(), 0);
    }
}
