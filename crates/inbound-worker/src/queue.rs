//! Job queue abstraction for enqueuing and dequeuing background jobs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing;
use uuid::Uuid;

use inbound_core::error::AppError;
use inbound_core::traits::MailQueue;
use inbound_core::types::{JobId, MailMessage};
use inbound_database::JobStore;
use inbound_entity::job::{CreateJob, Job, JobPayload, JobPriority, JobStatus};

/// Queue that carries outbound mail.
pub const MAIL_QUEUE: &str = "mail";

/// Parameters for creating a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreateParams {
    /// Type of job (e.g., "send_email")
    pub job_type: String,
    /// Queue name (e.g., "mail")
    pub queue: String,
    /// Priority level
    pub priority: JobPriority,
    /// Job payload as JSON
    pub payload: serde_json::Value,
    /// Maximum attempts
    pub max_attempts: i32,
    /// Optional scheduled time (run after this time)
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Job queue for enqueuing and dequeuing work
#[derive(Clone)]
pub struct JobQueue {
    store: Arc<dyn JobStore>,
    /// Worker identifier for claiming jobs
    worker_id: String,
    /// Attempts granted to mail jobs
    mail_max_attempts: i32,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("worker_id", &self.worker_id)
            .field("mail_max_attempts", &self.mail_max_attempts)
            .finish_non_exhaustive()
    }
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(store: Arc<dyn JobStore>, worker_id: String, mail_max_attempts: i32) -> Self {
        Self {
            store,
            worker_id,
            mail_max_attempts,
        }
    }

    /// Worker identifier used when claiming.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, params: JobCreateParams) -> Result<Job, AppError> {
        let job = self
            .store
            .create(&CreateJob {
                job_type: params.job_type,
                queue: params.queue,
                priority: params.priority,
                payload: params.payload,
                max_attempts: params.max_attempts,
                scheduled_at: params.scheduled_at,
            })
            .await?;

        tracing::debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            queue = %job.queue,
            priority = %job.priority,
            "Enqueued job"
        );

        Ok(job)
    }

    /// Dequeue the next available job from specified queues
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        for queue in queues {
            if let Some(job) = self.store.claim_next(queue, &self.worker_id).await? {
                tracing::debug!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    queue = %job.queue,
                    "Dequeued job"
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(
        &self,
        job_id: Uuid,
        result: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.store.complete(job_id, result).await?;
        tracing::debug!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: Uuid, error: &str) -> Result<(), AppError> {
        self.store.fail(job_id, error).await?;
        tracing::debug!(job_id = %job_id, error = %error, "Job failed");
        Ok(())
    }

    /// Return a running job to the queue for another attempt
    pub async fn retry(&self, job_id: Uuid, error: &str) -> Result<(), AppError> {
        self.store.retry(job_id, error).await?;
        tracing::debug!(job_id = %job_id, "Job queued for retry");
        Ok(())
    }

    /// Get queue statistics
    pub async fn stats(&self) -> Result<QueueStats, AppError> {
        Ok(QueueStats {
            pending: self.store.count_by_status(JobStatus::Pending).await?,
            running: self.store.count_by_status(JobStatus::Running).await?,
            failed: self.store.count_by_status(JobStatus::Failed).await?,
            worker_id: self.worker_id.clone(),
        })
    }
}

#[async_trait]
impl MailQueue for JobQueue {
    async fn enqueue_mail(&self, mail: MailMessage) -> Result<JobId, AppError> {
        let payload = JobPayload::SendEmail(mail);
        let job = self
            .enqueue(JobCreateParams {
                job_type: payload.job_type().to_string(),
                queue: MAIL_QUEUE.to_string(),
                priority: JobPriority::Normal,
                payload: serde_json::to_value(&payload)?,
                max_attempts: self.mail_max_attempts,
                scheduled_at: None,
            })
            .await?;
        Ok(JobId::from_uuid(job.id))
    }
}

/// Queue statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending jobs
    pub pending: i64,
    /// Number of running jobs
    pub running: i64,
    /// Number of failed jobs
    pub failed: i64,
    /// Current worker identifier
    pub worker_id: String,
}
