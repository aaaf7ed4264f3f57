//! Outbound mail queue abstraction.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{JobId, MailMessage};

/// Producer side of the durable mail queue.
#[async_trait]
pub trait MailQueue: Send + Sync + 'static {
    /// Enqueue a mail for asynchronous delivery.
    async fn enqueue_mail(&self, mail: MailMessage) -> AppResult<JobId>;
}
