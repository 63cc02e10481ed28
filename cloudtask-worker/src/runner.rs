/// Worker run loop
///
/// Pops jobs off the queue and dispatches them to handlers, one at a
/// time. Queue errors back off briefly instead of spinning; an empty pop
/// just loops, which is also where shutdown gets observed.

use std::sync::Arc;
use std::time::Duration;

use cloudtask_shared::jobs::JobQueue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::handlers;

/// How long to back off after a queue error
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Consumes the job queue until shutdown is requested
pub struct Worker {
    queue: Arc<dyn JobQueue>,
    poll_timeout: Duration,
    shutdown: CancellationToken,
}

impl Worker {
    /// Creates a worker over the given queue
    pub fn new(queue: Arc<dyn JobQueue>, poll_timeout: Duration) -> Self {
        Self {
            queue,
            poll_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token for requesting shutdown from another task
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs until the shutdown token is cancelled
    ///
    /// An in-flight job finishes before the loop exits; the blocking pop
    /// is bounded by `poll_timeout`, so cancellation is observed within
    /// one poll window.
    pub async fn run(&self) {
        info!("worker loop started");

        while !self.shutdown.is_cancelled() {
            match self.queue.dequeue(self.poll_timeout).await {
                Ok(Some(job)) => {
                    debug!(job_id = %job.id, job_name = %job.name, "processing job");
                    handlers::handle(&job).await;
                }
                Ok(None) => {
                    // Queue stayed empty for the whole poll window.
                }
                Err(e) => {
                    warn!(error = %e, "queue read failed, backing off");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }

        info!("worker loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudtask_shared::jobs::MemoryQueue;
    use serde_json::json;

    #[tokio::test]
    async fn test_worker_drains_queue_and_stops() {
        let queue = Arc::new(MemoryQueue::new());
        queue.enqueue("nonexistent", json!({})).await.unwrap();
        queue.enqueue("nonexistent", json!({})).await.unwrap();

        let worker = Worker::new(queue.clone(), Duration::from_millis(10));
        let shutdown = worker.shutdown_token();

        let handle = tokio::spawn(async move { worker.run().await });

        // Give the loop a moment to drain, then stop it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert!(queue.is_empty());
    }
}
