//! Typed job payload definitions.

use inbound_core::types::MailMessage;
use serde::{Deserialize, Serialize};

/// Typed payloads for known job types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum JobPayload {
    /// Render and deliver one templated mail.
    #[serde(rename = "send_email")]
    SendEmail(MailMessage),
}

impl JobPayload {
    /// Job type identifier stored alongside the payload.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::SendEmail(_) => "send_email",
        }
    }
}
