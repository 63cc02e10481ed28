/// Project endpoints
///
/// All handlers take the authenticated [`Actor`] from request extensions
/// (injected by the JWT middleware) and delegate authorization entirely to
/// the access service; nothing here inspects roles or owner ids.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use cloudtask_shared::access::projects::NewProject;
use cloudtask_shared::models::project::{Project, UpdateProject};
use cloudtask_shared::models::user::Actor;

use crate::{app::AppState, error::ApiResult, routes::Pagination};

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update project request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// `GET /api/v1/projects`
///
/// Lists projects visible to the caller, paginated. Admins see all
/// projects; everyone else their own.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state
        .access
        .list_projects(&actor, page.skip, page.limit)
        .await?;
    Ok(Json(projects))
}

/// `POST /api/v1/projects`
///
/// Creates a project owned by the caller.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = state
        .access
        .create_project(
            &actor,
            NewProject {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(project))
}

/// `GET /api/v1/projects/:id`
pub async fn get_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.access.get_project(&actor, id).await?;
    Ok(Json(project))
}

/// `PUT /api/v1/projects/:id`
///
/// Partial update; only fields present in the body change.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = state
        .access
        .update_project(
            &actor,
            id,
            UpdateProject {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(project))
}

/// `DELETE /api/v1/projects/:id`
///
/// Deletes the project (cascading to its tasks) and returns it.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.access.delete_project(&actor, id).await?;
    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_validation() {
        let valid = CreateProjectRequest {
            title: "Roadmap".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateProjectRequest {
            title: String::new(),
            description: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateProjectRequest {
            title: "x".repeat(256),
            description: None,
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_update_project_request_absent_title_passes() {
        let patch = UpdateProjectRequest::default();
        assert!(patch.validate().is_ok());
    }
}
