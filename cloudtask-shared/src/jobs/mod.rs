/// Background job queue
///
/// Fire-and-forget dispatch of work off the request path. The API enqueues
/// a job and moves on; the worker binary consumes the queue and runs the
/// handler. The queue is never load-bearing for request correctness: an
/// enqueue failure is logged by the caller and must not roll back a store
/// mutation that already committed.
///
/// Implementations:
///
/// - [`RedisQueue`]: a Redis list (LPUSH producer, BRPOP consumer). The
///   production transport.
/// - [`MemoryQueue`]: a VecDeque, for tests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod redis;

pub use self::memory::MemoryQueue;
pub use self::redis::RedisQueue;

/// Default Redis list the queue lives on
pub const DEFAULT_QUEUE_KEY: &str = "cloudtask:jobs";

/// Job name for the task-created notification
pub const TASK_NOTIFICATION: &str = "task_notification";

/// Errors raised by a queue backend
#[derive(Debug, Error)]
pub enum QueueError {
    /// The backend could not be reached or refused the command
    #[error("queue unavailable: {0}")]
    Unavailable(String),

    /// A job envelope could not be (de)serialized
    #[error("job serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A unit of background work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: Uuid,

    /// Handler name (e.g. "task_notification")
    pub name: String,

    /// Handler-specific arguments
    pub args: JsonValue,

    /// When the job was enqueued
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    /// Builds a job envelope with a fresh ID
    pub fn new(name: &str, args: JsonValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            args,
            enqueued_at: Utc::now(),
        }
    }
}

/// FIFO queue of [`Job`] envelopes
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueues a job, returning its ID
    async fn enqueue(&self, name: &str, args: JsonValue) -> Result<Uuid, QueueError>;

    /// Pops the oldest job, waiting up to `timeout`
    ///
    /// `Ok(None)` means the queue stayed empty for the whole wait.
    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError>;
}
