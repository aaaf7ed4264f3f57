//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Local storage configuration. Scanned paths are relative to `data_root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory that holds staged and accepted uploads.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Maximum upload size in bytes (default 100 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl StorageConfig {
    /// The storage root as a path.
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.data_root)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_data_root() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MiB
}
