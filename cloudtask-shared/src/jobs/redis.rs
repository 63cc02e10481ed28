/// Redis-backed job queue
///
/// Producer LPUSHes JSON envelopes onto a list; consumers BRPOP from the
/// other end, giving FIFO delivery across any number of workers.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value as JsonValue;
use tracing::debug;
use uuid::Uuid;

use crate::jobs::{Job, JobQueue, QueueError, DEFAULT_QUEUE_KEY};

/// Queue over a Redis list
#[derive(Clone)]
pub struct RedisQueue {
    manager: ConnectionManager,
    queue_key: String,
}

impl RedisQueue {
    /// Connects to Redis at `url` using the default queue key
    pub async fn connect(url: &str) -> Result<Self, QueueError> {
        Self::connect_with_key(url, DEFAULT_QUEUE_KEY).await
    }

    /// Connects to Redis at `url` using a custom queue key
    pub async fn connect_with_key(url: &str, queue_key: &str) -> Result<Self, QueueError> {
        let client = Client::open(url)
            .map_err(|e| QueueError::Unavailable(format!("invalid Redis URL: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| QueueError::Unavailable(format!("failed to connect to Redis: {}", e)))?;

        tracing::info!(queue_key, "Redis job queue connected");

        Ok(Self {
            manager,
            queue_key: queue_key.to_string(),
        })
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn enqueue(&self, name: &str, args: JsonValue) -> Result<Uuid, QueueError> {
        let job = Job::new(name, args);
        let payload = serde_json::to_string(&job)?;

        let mut conn = self.manager.clone();
        conn.lpush::<_, _, ()>(&self.queue_key, payload)
            .await
            .map_err(|e| QueueError::Unavailable(e.to_string()))?;

        debug!(job_id = %job.id, job_name = %job.name, "job enqueued");
        Ok(job.id)
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError> {
        let mut conn = self.manager.clone();

        // BRPOP returns (key, payload); timeout 0 would block forever, so
        // keep at least one second to let the worker loop observe shutdown.
        let popped: Option<(String, String)> = conn
            .brpop(&self.queue_key, timeout.as_secs().max(1) as f64)
            .await
            .map_err(|e| QueueError::Unavailable(e.to_string()))?;

        match popped {
            Some((_, payload)) => {
                let job: Job = serde_json::from_str(&payload)?;
                debug!(job_id = %job.id, job_name = %job.name, "job dequeued");
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }
}
