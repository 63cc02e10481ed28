/// In-memory job queue
///
/// VecDeque-backed [`JobQueue`] for tests. `dequeue` does not block; an
/// empty queue returns `Ok(None)` immediately.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::jobs::{Job, JobQueue, QueueError};

/// Queue over a process-local deque
#[derive(Default)]
pub struct MemoryQueue {
    jobs: Mutex<VecDeque<Job>>,
}

impl MemoryQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending jobs
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// True when no jobs are pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, name: &str, args: JsonValue) -> Result<Uuid, QueueError> {
        let job = Job::new(name, args);
        let id = job.id;
        self.jobs.lock().unwrap().push_back(job);
        Ok(id)
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<Job>, QueueError> {
        if let Some(job) = self.jobs.lock().unwrap().pop_front() {
            return Ok(Some(job));
        }

        // Approximate BRPOP: wait out the timeout, then try once more.
        // The sleep also keeps polling consumers from spinning hot.
        tokio::time::sleep(timeout).await;
        Ok(self.jobs.lock().unwrap().pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = MemoryQueue::new();
        queue.enqueue("first", json!({})).await.unwrap();
        queue.enqueue("second", json!({})).await.unwrap();

        let a = queue.dequeue(Duration::ZERO).await.unwrap().unwrap();
        let b = queue.dequeue(Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(a.name, "first");
        assert_eq!(b.name, "second");
        assert!(queue.dequeue(Duration::ZERO).await.unwrap().is_none());
    }
}
