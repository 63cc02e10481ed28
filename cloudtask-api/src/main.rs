//! # CloudTask API Server
//!
//! Multi-tenant project/task management API: authenticated users create
//! projects and tasks, role-based access control gates every read and
//! write, and hot task lookups are served from a Redis read-through cache.
//! Background notifications are dispatched to the worker via a Redis job
//! queue.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cloudtask-api
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudtask_api::app::{build_router, AppState};
use cloudtask_api::config::Config;
use cloudtask_shared::cache::RedisCache;
use cloudtask_shared::db::{self, pool::DatabaseConfig};
use cloudtask_shared::jobs::RedisQueue;
use cloudtask_shared::store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudtask_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CloudTask API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = db::create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    db::run_migrations(&pool).await?;

    let cache = RedisCache::connect(&config.redis.url)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let queue = RedisQueue::connect(&config.redis.url)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let bind_address = config.bind_address();
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(cache),
        Arc::new(queue),
        config,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
