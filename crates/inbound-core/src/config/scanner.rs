//! Antivirus scanner configuration.

use serde::{Deserialize, Serialize};

/// Endpoint settings for the ClamAV-compatible HTTP scan service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Scan endpoint URL. Unset or blank disables scanning.
    #[serde(default)]
    pub url: Option<String>,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Multipart field that carries the file.
    #[serde(default = "default_field_name")]
    pub field_name: String,
}

impl ScannerConfig {
    /// The configured endpoint, treating blank values as unset.
    pub fn endpoint(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_timeout(),
            field_name: default_field_name(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_field_name() -> String {
    "FILES".to_string()
}
