//! Queued outbound mail.

use serde::{Deserialize, Serialize};

/// Templates known to the mail worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTemplate {
    /// Invitation to upload into an owner's reverse share.
    ReverseShareInvite,
}

impl MailTemplate {
    /// Stable template identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReverseShareInvite => "reverse_share_invite",
        }
    }
}

/// A mail handed to the asynchronous dispatch queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// Delivery address.
    pub recipient: String,
    /// Template to render.
    pub template: MailTemplate,
    /// Template variables.
    pub payload: serde_json::Value,
}
