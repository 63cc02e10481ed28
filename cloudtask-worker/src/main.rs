//! # CloudTask Worker
//!
//! Consumes the background job queue the API produces into: notification
//! jobs enqueued on task creation. The queue is decoupled from the request
//! path, so nothing here is load-bearing for API correctness.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p cloudtask-worker
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudtask_shared::jobs::RedisQueue;
use cloudtask_worker::config::Config;
use cloudtask_worker::runner::Worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudtask_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CloudTask Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let queue = RedisQueue::connect_with_key(&config.redis_url, &config.queue_key)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let worker = Worker::new(
        Arc::new(queue),
        Duration::from_secs(config.poll_timeout_secs),
    );
    let shutdown = worker.shutdown_token();

    let worker_handle = tokio::spawn(async move { worker.run().await });

    tracing::info!("Worker ready and listening for jobs");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, draining...");

    shutdown.cancel();
    worker_handle.await?;

    tracing::info!("Worker exited cleanly");
    Ok(())
}
