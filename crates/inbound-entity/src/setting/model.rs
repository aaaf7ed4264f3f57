//! Key/value setting rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Setting key for the reverse share feature flag.
pub const ALLOW_REVERSE_SHARES: &str = "allow_reverse_shares";

/// A runtime setting stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    /// Setting key.
    pub key: String,
    /// Raw string value.
    pub value: String,
    /// When the value last changed.
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Interpret the value as a flag.
    pub fn as_bool(&self) -> bool {
        parse_flag(&self.value)
    }
}

/// Lenient boolean: `1`, `true`, `on`, `yes` (any case) are true.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
