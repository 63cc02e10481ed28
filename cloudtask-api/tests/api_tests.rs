/// Integration tests for the CloudTask API
///
/// Drive the full router (JWT middleware, handlers, error mapping) over
/// in-memory backends. Status-code assertions here pin the transport
/// mapping: 401 unauthenticated, 403 forbidden, 404 absent, 409 duplicate,
/// 422 invalid payload.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{login, register, register_and_login, send, spawn_app};

#[tokio::test]
async fn health_check_reports_healthy() {
    let ctx = spawn_app();

    let (status, body) = send(&ctx.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn register_returns_user_without_password() {
    let ctx = spawn_app();

    let body = register(&ctx.app, "new@example.com", "testpassword").await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"], "user");
    assert_eq!(body["is_active"], true);
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let ctx = spawn_app();

    register(&ctx.app, "dup@example.com", "testpassword").await;
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "dup@example.com", "password": "testpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn register_rejects_invalid_payload() {
    let ctx = spawn_app();

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn login_round_trip_and_rejection() {
    let ctx = spawn_app();
    register(&ctx.app, "login@example.com", "testpassword").await;

    let token = login(&ctx.app, "login@example.com", "testpassword").await;
    assert!(!token.is_empty());

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "login@example.com", "password": "wrongpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "testpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let ctx = spawn_app();

    let (status, _) = send(&ctx.app, "GET", "/api/v1/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &ctx.app,
        "GET",
        "/api/v1/tasks",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_crud_flow() {
    let ctx = spawn_app();
    let token = register_and_login(&ctx.app, "owner@example.com").await;

    // Create
    let (status, project) = send(
        &ctx.app,
        "POST",
        "/api/v1/projects",
        Some(&token),
        Some(json!({ "title": "Roadmap", "description": "Q3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["title"], "Roadmap");
    let project_id = project["id"].as_str().unwrap().to_string();

    // List contains it
    let (status, list) = send(&ctx.app, "GET", "/api/v1/projects", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Partial update keeps untouched fields
    let (status, updated) = send(
        &ctx.app,
        "PUT",
        &format!("/api/v1/projects/{}", project_id),
        Some(&token),
        Some(json!({ "title": "Roadmap v2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Roadmap v2");
    assert_eq!(updated["description"], "Q3");

    // Delete, then 404
    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/api/v1/projects/{}", project_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/projects/{}", project_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_project_is_forbidden_not_hidden() {
    let ctx = spawn_app();
    let owner_token = register_and_login(&ctx.app, "owner@example.com").await;
    let other_token = register_and_login(&ctx.app, "other@example.com").await;

    let (_, project) = send(
        &ctx.app,
        "POST",
        "/api/v1/projects",
        Some(&owner_token),
        Some(json!({ "title": "Private" })),
    )
    .await;
    let project_id = project["id"].as_str().unwrap();

    let (status, body) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/projects/{}", project_id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // And the other user's listing stays empty, no leakage.
    let (_, list) = send(&ctx.app, "GET", "/api/v1/projects", Some(&other_token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn task_flow_with_cache_and_notification() {
    let ctx = spawn_app();
    let owner_token = register_and_login(&ctx.app, "owner@example.com").await;
    let other_token = register_and_login(&ctx.app, "other@example.com").await;

    let (_, project) = send(
        &ctx.app,
        "POST",
        "/api/v1/projects",
        Some(&owner_token),
        Some(json!({ "title": "P1" })),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    // Create task enqueues exactly one notification job.
    assert!(ctx.queue.is_empty());
    let (status, task) = send(
        &ctx.app,
        "POST",
        "/api/v1/tasks",
        Some(&owner_token),
        Some(json!({ "title": "Tk1", "project_id": project_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "todo");
    assert_eq!(ctx.queue.len(), 1);
    let task_id = task["id"].as_str().unwrap().to_string();

    // Stranger denied, owner read returns the projection with owner_id.
    let (status, _) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, read) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(read["owner_id"].is_string());
    assert!(!ctx.cache.is_empty());

    // Stranger still denied on the warm cache.
    let (status, _) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Update invalidates; the re-read sees the new status.
    let (status, _) = send(
        &ctx.app,
        "PUT",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&owner_token),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.cache.is_empty());

    let (_, reread) = send(
        &ctx.app,
        "GET",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(reread["status"], "done");
}

#[tokio::test]
async fn task_create_under_foreign_or_missing_project() {
    let ctx = spawn_app();
    let owner_token = register_and_login(&ctx.app, "owner@example.com").await;
    let other_token = register_and_login(&ctx.app, "other@example.com").await;

    let (_, project) = send(
        &ctx.app,
        "POST",
        "/api/v1/projects",
        Some(&owner_token),
        Some(json!({ "title": "P1" })),
    )
    .await;
    let project_id = project["id"].as_str().unwrap();

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/api/v1/tasks",
        Some(&other_token),
        Some(json!({ "title": "sneaky", "project_id": project_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/api/v1/tasks",
        Some(&owner_token),
        Some(json!({ "title": "orphan", "project_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_task_stays_deleted() {
    let ctx = spawn_app();
    let token = register_and_login(&ctx.app, "owner@example.com").await;

    let (_, project) = send(
        &ctx.app,
        "POST",
        "/api/v1/projects",
        Some(&token),
        Some(json!({ "title": "P" })),
    )
    .await;
    let (_, task) = send(
        &ctx.app,
        "POST",
        "/api/v1/tasks",
        Some(&token),
        Some(json!({ "title": "T", "project_id": project["id"] })),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    // Warm the cache, then delete.
    send(
        &ctx.app,
        "GET",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&token),
        None,
    )
    .await;

    let (status, _) = send(
        &ctx.app,
        "DELETE",
        &format!("/api/v1/tasks/{}", task_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Never served from a leftover cache entry, and idempotently 404.
    for _ in 0..2 {
        let (status, _) = send(
            &ctx.app,
            "GET",
            &format!("/api/v1/tasks/{}", task_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &ctx.app,
            "DELETE",
            &format!("/api/v1/tasks/{}", task_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
