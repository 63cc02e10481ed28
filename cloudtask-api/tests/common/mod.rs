/// Common test utilities for API integration tests
///
/// Builds the real router over in-memory store/cache/queue fakes, so the
/// full HTTP surface (middleware included) is exercised without Postgres
/// or Redis.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt as _;

use cloudtask_api::app::{build_router, AppState};
use cloudtask_api::config::{
    ApiConfig, CacheConfig, Config, DatabaseConfig, JwtConfig, RedisConfig,
};
use cloudtask_shared::cache::MemoryCache;
use cloudtask_shared::jobs::MemoryQueue;
use cloudtask_shared::store::MemoryStore;

/// Test harness holding the router and handles to the backing fakes
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub queue: Arc<MemoryQueue>,
}

/// Builds a fresh application over empty in-memory backends
pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new());
    let queue = Arc::new(MemoryQueue::new());

    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            access_token_expire_minutes: 30,
        },
        cache: CacheConfig { ttl_secs: 300 },
    };

    let state = AppState::new(store.clone(), cache.clone(), queue.clone(), config);

    TestApp {
        app: build_router(state),
        store,
        cache,
        queue,
    }
}

/// Sends a request and returns (status, parsed JSON body)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Registers a user and returns the response body
pub async fn register(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": password,
            "full_name": "Test User"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body
}

/// Logs a user in and returns the bearer token
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

/// Registers and logs in, returning the bearer token
pub async fn register_and_login(app: &Router, email: &str) -> String {
    register(app, email, "testpassword").await;
    login(app, email, "testpassword").await
}
