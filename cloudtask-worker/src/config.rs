/// Configuration management for the worker
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection string (required)
/// - `WORKER_QUEUE_KEY`: Redis list to consume (default: cloudtask:jobs)
/// - `WORKER_POLL_TIMEOUT_SECS`: blocking-pop timeout (default: 5)

use std::env;

use cloudtask_shared::jobs::DEFAULT_QUEUE_KEY;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,

    /// Redis list the job queue lives on
    pub queue_key: String,

    /// How long each blocking pop waits before re-checking for shutdown
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `REDIS_URL` is missing or a value fails to
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let redis_url = env::var("REDIS_URL")
            .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?;

        let queue_key =
            env::var("WORKER_QUEUE_KEY").unwrap_or_else(|_| DEFAULT_QUEUE_KEY.to_string());

        let poll_timeout_secs = env::var("WORKER_POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()?;

        Ok(Self {
            redis_url,
            queue_key,
            poll_timeout_secs,
        })
    }
}
