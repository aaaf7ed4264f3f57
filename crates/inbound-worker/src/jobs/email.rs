//! `send_email` job: render a queued mail and hand it to a transport.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing;

use inbound_core::config::MailConfig;
use inbound_core::error::AppError;
use inbound_core::types::{MailMessage, MailTemplate};
use inbound_entity::job::{Job, JobPayload};

use crate::executor::{JobExecutionError, JobHandler};

/// A mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
}

/// Delivers rendered mail.
#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver one mail.
    async fn send(&self, mail: &RenderedMail) -> Result<(), AppError>;
}

/// Transport that records the envelope in the log instead of sending.
#[derive(Debug, Clone, Default)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: &RenderedMail) -> Result<(), AppError> {
        // Body carries the upload link; keep it out of the log.
        tracing::info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "Mail dispatched"
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct InviteVars {
    user: OwnerVars,
    invite: InviteFields,
    token: String,
}

#[derive(Debug, Deserialize)]
struct OwnerVars {
    name: String,
}

#[derive(Debug, Deserialize)]
struct InviteFields {
    recipient_name: String,
    message: Option<String>,
    expires_at: DateTime<Utc>,
}

/// Renders and sends queued mail
#[derive(Debug)]
pub struct SendEmailJobHandler {
    transport: Arc<dyn MailTransport>,
    from_address: String,
    app_url: String,
}

impl SendEmailJobHandler {
    /// Create a new handler
    pub fn new(transport: Arc<dyn MailTransport>, config: &MailConfig) -> Self {
        Self {
            transport,
            from_address: config.from_address.clone(),
            app_url: config.app_url.trim_end_matches('/').to_string(),
        }
    }

    /// Render a queued mail into subject and body.
    pub fn render(&self, mail: &MailMessage) -> Result<RenderedMail, JobExecutionError> {
        match mail.template {
            MailTemplate::ReverseShareInvite => self.render_invite(mail),
        }
    }

    fn render_invite(&self, mail: &MailMessage) -> Result<RenderedMail, JobExecutionError> {
        let vars: InviteVars = serde_json::from_value(mail.payload.clone()).map_err(|e| {
            JobExecutionError::Permanent(format!("Invalid reverse share invite payload: {e}"))
        })?;

        let owner = vars.user.name;
        let link = format!("{}/reverse-shares/upload?token={}", self.app_url, vars.token);

        let mut body = format!(
            "Hello {},\n\n{} has invited you to upload files.\n\n",
            vars.invite.recipient_name, owner
        );
        if let Some(message) = vars.invite.message.filter(|m| !m.trim().is_empty()) {
            body.push_str(&format!("Message from {owner}:\n{message}\n\n"));
        }
        body.push_str(&format!("Upload your files here:\n{link}\n\n"));
        body.push_str(&format!(
            "This link expires on {}.\n",
            vars.invite.expires_at.format("%Y-%m-%d %H:%M UTC")
        ));

        Ok(RenderedMail {
            from: self.from_address.clone(),
            to: mail.recipient.clone(),
            subject: format!("{owner} invited you to upload files"),
            body,
        })
    }
}

#[async_trait]
impl JobHandler for SendEmailJobHandler {
    fn job_type(&self) -> &str {
        "send_email"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let JobPayload::SendEmail(mail) = serde_json::from_value::<JobPayload>(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Invalid send_email payload: {e}")))?;

        let rendered = self.render(&mail)?;

        self.transport
            .send(&rendered)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Mail transport failed: {e}")))?;

        Ok(Some(serde_json::json!({
            "recipient": mail.recipient,
            "template": mail.template.as_str(),
        })))
    }
}
