//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Settings used when rendering queued mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address on outbound mail.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Public base URL used to build links in mail bodies.
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from(),
            app_url: default_app_url(),
        }
    }
}

fn default_from() -> String {
    "no-reply@localhost".to_string()
}

fn default_app_url() -> String {
    "http://localhost:8080".to_string()
}
