//! Worker runner: main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing;

use inbound_core::config::WorkerConfig;
use inbound_core::error::AppError;
use inbound_entity::job::Job;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::{JobQueue, MAIL_QUEUE};

/// How long shutdown waits for in-flight jobs.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Main worker runner that polls queues and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    queue: Arc<JobQueue>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
    /// Queues to poll (in priority order)
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
            queues: vec![MAIL_QUEUE.to_string()],
        }
    }

    /// Start the worker runner: runs until the cancel signal is received
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let worker_id = self.queue.worker_id().to_string();
        tracing::info!(
            worker_id = %worker_id,
            concurrency = self.config.concurrency,
            poll_interval = self.config.poll_interval_seconds,
            queues = ?self.queues,
            "Worker started"
        );

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            if *cancel.borrow() {
                tracing::info!(worker_id = %worker_id, "Worker received shutdown signal");
                break;
            }

            // Not raced against shutdown: a claimed job must reach its task.
            self.poll_and_execute(&semaphore).await;

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!(worker_id = %worker_id, "Worker shutting down");
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        tracing::info!(worker_id = %worker_id, "Waiting for in-flight jobs to complete");

        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(DRAIN_TIMEOUT, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker_id = %worker_id, "Shutdown drain timed out");
        }

        tracing::info!(worker_id = %worker_id, "Worker shut down complete");
    }

    /// Claim and run one job inline. Returns whether a job was found.
    pub async fn process_next(&self) -> Result<bool, AppError> {
        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();
        match self.queue.dequeue(&queue_refs).await? {
            Some(job) => {
                let outcome = self.executor.execute(&job).await;
                settle(&self.queue, &job, outcome).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Poll for a job and execute it if available
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) {
        let Ok(permit) = semaphore.clone().try_acquire_owned() else {
            tracing::trace!("All worker slots occupied, waiting");
            return;
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();

        match self.queue.dequeue(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);

                tokio::spawn(async move {
                    let _permit = permit;
                    let outcome = executor.execute(&job).await;
                    settle(&queue, &job, outcome).await;
                });
            }
            Ok(None) => {
                tracing::trace!("No jobs available in queues");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to dequeue job");
            }
        }
    }
}

/// Record the outcome of one attempt. Transient failures go back to the
/// queue while attempts remain.
async fn settle(queue: &JobQueue, job: &Job, outcome: Result<Option<Value>, JobExecutionError>) {
    let job_id = job.id;
    let recorded = match outcome {
        Ok(result) => {
            tracing::info!(job_id = %job_id, job_type = %job.job_type, "Job completed");
            queue.complete(job_id, result).await
        }
        Err(JobExecutionError::Transient(msg)) if job.can_retry() => {
            tracing::warn!(
                job_id = %job_id,
                attempt = job.attempts,
                max_attempts = job.max_attempts,
                error = %msg,
                "Job failed, will retry"
            );
            queue.retry(job_id, &msg).await
        }
        Err(JobExecutionError::Transient(msg)) => {
            tracing::error!(
                job_id = %job_id,
                attempts = job.attempts,
                error = %msg,
                "Job failed, attempts exhausted"
            );
            queue.fail(job_id, &msg).await
        }
        Err(JobExecutionError::Permanent(msg)) => {
            tracing::error!(job_id = %job_id, error = %msg, "Job failed permanently");
            queue.fail(job_id, &msg).await
        }
        Err(JobExecutionError::Internal(err)) => {
            let msg = err.to_string();
            tracing::error!(job_id = %job_id, error = %msg, "Job internal error");
            queue.fail(job_id, &msg).await
        }
    };

    if let Err(e) = recorded {
        tracing::error!(job_id = %job_id, error = %e, "Failed to record job outcome");
    }
}
