//! Reverse share configuration.

use serde::{Deserialize, Serialize};

/// Which existing accounts may stand in as the guest for a recipient address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountMatch {
    /// Any account with the recipient's email is reused, guest or not.
    #[default]
    Any,
    /// Only guest accounts are reused; full accounts are never handed out.
    GuestsOnly,
}

/// Reverse share provisioning settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverseShareConfig {
    /// Policy for matching recipient addresses to existing accounts.
    #[serde(default)]
    pub account_match: AccountMatch,
}
