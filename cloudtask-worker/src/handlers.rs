/// Job handlers
///
/// Each job name maps to one handler. Handlers are infallible from the
/// runner's point of view once dispatched: a failed job is logged and
/// dropped, not retried. The queue carries best-effort notifications, not
/// state the system depends on.

use std::time::Duration;

use cloudtask_shared::jobs::{Job, TASK_NOTIFICATION};
use tracing::{info, warn};

/// Dispatches a job to its handler by name
pub async fn handle(job: &Job) {
    match job.name.as_str() {
        TASK_NOTIFICATION => task_notification(job).await,
        other => {
            warn!(job_id = %job.id, job_name = %other, "unknown job name, dropping");
        }
    }
}

/// Sends a notification for a newly created task
///
/// Stands in for a real delivery channel (email, webhook); the send itself
/// is simulated with a short delay.
async fn task_notification(job: &Job) {
    let task_id = job.args["task_id"].as_str().unwrap_or("<unknown>");
    let title = job.args["title"].as_str().unwrap_or("<untitled>");

    info!(job_id = %job.id, task_id, title, "starting task notification");
    tokio::time::sleep(Duration::from_secs(5)).await;
    info!(job_id = %job.id, task_id, "finished task notification");
}
