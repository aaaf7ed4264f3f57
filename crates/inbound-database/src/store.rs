//! Store traits implemented by the PostgreSQL repositories and the
//! in-memory stores.

use async_trait::async_trait;
use uuid::Uuid;

use inbound_core::result::AppResult;
use inbound_entity::invite::{CreateReverseShareInvite, ReverseShareInvite};
use inbound_entity::job::{CreateJob, Job, JobStatus};
use inbound_entity::setting::Setting;
use inbound_entity::user::{CreateUser, User};

/// Account persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by stored email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find the guest registered for a recipient's real address.
    async fn find_guest_for(&self, recipient_email: &str) -> AppResult<Option<User>>;

    /// Insert a user. Email collisions are `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Insert a guest and claim `recipient_email` for it atomically.
    ///
    /// If the address is already claimed, nothing is written and the
    /// existing guest is returned. Placeholder collisions are `Conflict`.
    async fn create_guest(&self, recipient_email: &str, data: &CreateUser) -> AppResult<User>;
}

/// Invite persistence. Invites are insert-only.
#[async_trait]
pub trait InviteStore: Send + Sync + 'static {
    /// Insert an invite under the id carried by `data`.
    async fn create(&self, data: &CreateReverseShareInvite) -> AppResult<ReverseShareInvite>;

    /// Find an invite by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ReverseShareInvite>>;

    /// All invites created by an owner, newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<ReverseShareInvite>>;
}

/// Runtime key/value settings.
#[async_trait]
pub trait SettingStore: Send + Sync + 'static {
    /// Read a setting.
    async fn get(&self, key: &str) -> AppResult<Option<Setting>>;

    /// Insert or replace a setting.
    async fn set(&self, key: &str, value: &str) -> AppResult<Setting>;
}

/// Durable job queue storage.
#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// Insert a pending job.
    async fn create(&self, data: &CreateJob) -> AppResult<Job>;

    /// Find a job by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;

    /// Claim the next due pending job on `queue`, marking it running and
    /// bumping its attempt count. Never hands one job to two workers.
    async fn claim_next(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>>;

    /// Mark a job completed.
    async fn complete(&self, id: Uuid, result: Option<serde_json::Value>) -> AppResult<()>;

    /// Mark a job failed for good.
    async fn fail(&self, id: Uuid, error_message: &str) -> AppResult<()>;

    /// Put a running job back to pending, recording the last error.
    async fn retry(&self, id: Uuid, error_message: &str) -> AppResult<()>;

    /// Count jobs in a status.
    async fn count_by_status(&self, status: JobStatus) -> AppResult<i64>;
}
