/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with
/// all routes and middleware. The state carries the injected capabilities
/// (store, cache, queue) rather than raw connections, so tests assemble
/// the same router over in-memory fakes.
///
/// # Router Layout
///
/// ```text
/// /
/// ├── /health                      # Health check (public)
/// └── /api/v1/
///     ├── /auth/
///     │   ├── POST /register       # Create account (public)
///     │   └── POST /login          # Obtain access token (public)
///     ├── /projects/               # CRUD (JWT required)
///     └── /tasks/                  # CRUD (JWT required)
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use cloudtask_shared::access::AccessService;
use cloudtask_shared::auth::jwt;
use cloudtask_shared::cache::Cache;
use cloudtask_shared::jobs::JobQueue;
use cloudtask_shared::models::user::Actor;
use cloudtask_shared::store::Store;

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state
///
/// Cloned into each request handler via axum's `State` extractor; all
/// fields are cheap `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    /// Durable storage, also used directly by the auth routes
    pub store: Arc<dyn Store>,

    /// Authorization-aware data access over store + cache
    pub access: Arc<AccessService>,

    /// Background job queue
    pub queue: Arc<dyn JobQueue>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Assembles application state from injected capabilities
    pub fn new(
        store: Arc<dyn Store>,
        cache: Arc<dyn Cache>,
        queue: Arc<dyn JobQueue>,
        config: Config,
    ) -> Self {
        let access = AccessService::new(store.clone(), cache)
            .with_cache_ttl(std::time::Duration::from_secs(config.cache.ttl_secs));

        Self {
            store,
            access: Arc::new(access),
            queue,
            config: Arc::new(config),
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Access token lifetime
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.config.jwt.access_token_expire_minutes)
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;
    use axum::routing::post;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: no token needed to register or log in.
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the Bearer token, then resolves the subject to a fresh
/// [`Actor`] through the store (role and activity status come from the
/// store on every request, never from token claims) and injects it into
/// request extensions for handlers to extract.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = state
        .store
        .get_user(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    req.extensions_mut().insert::<Actor>(user.actor());

    Ok(next.run(req).await)
}
