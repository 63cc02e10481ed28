/// Task endpoints
///
/// Single-task reads return the cached projection shape (task fields plus
/// the owning project's `owner_id`); mutations return the store row. After
/// a successful create, a notification job is enqueued fire-and-forget:
/// the committed task is returned whether or not the queue accepted it.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use cloudtask_shared::jobs::TASK_NOTIFICATION;
use cloudtask_shared::models::task::{
    CreateTask, Task, TaskProjection, TaskStatus, UpdateTask,
};
use cloudtask_shared::models::user::Actor;

use crate::{app::AppState, error::ApiResult};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (default: todo)
    #[serde(default)]
    pub status: TaskStatus,

    /// Owning project
    pub project_id: Uuid,
}

/// Update task request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

/// Query parameters for task listings
///
/// Pagination fields are inlined rather than flattened: serde's flatten
/// buffering does not round-trip numeric values through the urlencoded
/// deserializer.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksParams {
    /// Restrict to one project (requires access to that project)
    pub project_id: Option<Uuid>,

    /// Records to skip
    #[serde(default)]
    pub skip: i64,

    /// Page size
    #[serde(default = "super::default_limit")]
    pub limit: i64,
}

/// `GET /api/v1/tasks`
///
/// Lists tasks visible to the caller. With `project_id`, the project must
/// exist and be accessible; without it, results are silently filtered to
/// the caller's ownership (admins see everything).
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .access
        .list_tasks(&actor, params.project_id, params.skip, params.limit)
        .await?;
    Ok(Json(tasks))
}

/// `POST /api/v1/tasks`
///
/// Creates a task under a project the caller may write to, then enqueues
/// a notification job. Queue failures are logged and never fail the
/// request: the store commit has already happened.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .access
        .create_task(
            &actor,
            CreateTask {
                title: req.title,
                description: req.description,
                status: req.status,
                project_id: req.project_id,
            },
        )
        .await?;

    if let Err(e) = state
        .queue
        .enqueue(
            TASK_NOTIFICATION,
            json!({ "task_id": task.id, "title": task.title }),
        )
        .await
    {
        tracing::warn!(task_id = %task.id, error = %e, "failed to enqueue notification job");
    }

    Ok(Json(task))
}

/// `GET /api/v1/tasks/:id`
///
/// Read-through cached single-task lookup.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskProjection>> {
    let projection = state.access.get_task(&actor, id).await?;
    Ok(Json(projection))
}

/// `PUT /api/v1/tasks/:id`
///
/// Partial update; invalidates the task's cache entry.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .access
        .update_task(
            &actor,
            id,
            UpdateTask {
                title: req.title,
                description: req.description,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(task))
}

/// `DELETE /api/v1/tasks/:id`
///
/// Deletes the task (store first, then cache) and returns it.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.access.delete_task(&actor, id).await?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            title: "Write docs".to_string(),
            description: None,
            status: TaskStatus::Todo,
            project_id: Uuid::new_v4(),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: String::new(),
            description: None,
            status: TaskStatus::Todo,
            project_id: Uuid::new_v4(),
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_create_task_request_status_defaults_to_todo() {
        let req: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "title": "T",
            "project_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(req.status, TaskStatus::Todo);
    }

    #[test]
    fn test_update_task_request_accepts_status_only() {
        let req: UpdateTaskRequest =
            serde_json::from_value(serde_json::json!({ "status": "done" })).unwrap();
        assert_eq!(req.status, Some(TaskStatus::Done));
        assert!(req.title.is_none());
        assert!(req.validate().is_ok());
    }
}
