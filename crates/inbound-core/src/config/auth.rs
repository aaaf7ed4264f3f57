//! Authentication and credential configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token signing and guest credential encryption settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Base64-encoded 32-byte key used to encrypt guest tokens.
    ///
    /// Empty means credential issuance is unavailable.
    #[serde(default)]
    pub encryption_key: String,
    /// Lifetime of a guest token in days.
    #[serde(default = "default_guest_ttl")]
    pub guest_token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            encryption_key: String::new(),
            guest_token_ttl_days: default_guest_ttl(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_access_ttl_minutes", &self.jwt_access_ttl_minutes)
            .field(
                "encryption_key",
                &if self.encryption_key.is_empty() {
                    "<unset>"
                } else {
                    "[REDACTED]"
                },
            )
            .field("guest_token_ttl_days", &self.guest_token_ttl_days)
            .finish()
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_guest_ttl() -> i64 {
    7
}
