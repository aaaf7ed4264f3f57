//! In-memory job store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use inbound_core::error::AppError;
use inbound_core::result::AppResult;
use inbound_entity::job::{CreateJob, Job, JobStatus};

use crate::store::JobStore;

/// Job store backed by a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every job, oldest first.
    pub async fn all(&self) -> Vec<Job> {
        self.jobs.lock().await.clone()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut Job) + Send,
    {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| AppError::not_found(format!("Job {id} not found")))?;
        apply(job);
        job.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, data: &CreateJob) -> AppResult<Job> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            job_type: data.job_type.clone(),
            queue: data.queue.clone(),
            priority: data.priority,
            payload: data.payload.clone(),
            result: None,
            error_message: None,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: data.max_attempts,
            scheduled_at: data.scheduled_at,
            started_at: None,
            completed_at: None,
            worker_id: None,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().await.push(job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        Ok(self.jobs.lock().await.iter().find(|j| j.id == id).cloned())
    }

    async fn claim_next(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().await;
        let next = jobs
            .iter_mut()
            .filter(|j| {
                j.queue == queue
                    && j.status == JobStatus::Pending
                    && j.scheduled_at.is_none_or(|at| at <= now)
            })
            .min_by_key(|j| (std::cmp::Reverse(j.priority.numeric_priority()), j.created_at));

        Ok(next.map(|job| {
            job.status = JobStatus::Running;
            job.started_at = Some(now);
            job.worker_id = Some(worker_id.to_string());
            job.attempts += 1;
            job.updated_at = now;
            job.clone()
        }))
    }

    async fn complete(&self, id: Uuid, result: Option<serde_json::Value>) -> AppResult<()> {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.result = result;
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn fail(&self, id: Uuid, error_message: &str) -> AppResult<()> {
        let message = error_message.to_string();
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(message);
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    async fn retry(&self, id: Uuid, error_message: &str) -> AppResult<()> {
        let message = error_message.to_string();
        self.update(id, |job| {
            if job.status == JobStatus::Running {
                job.status = JobStatus::Pending;
                job.error_message = Some(message);
                job.started_at = None;
                job.worker_id = None;
            }
        })
        .await
    }

    async fn count_by_status(&self, status: JobStatus) -> AppResult<i64> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.iter().filter(|j| j.status == status).count() as i64)
    }
}
