//! Malware scanner abstraction.

use async_trait::async_trait;

use crate::types::{FileRef, ScanVerdict};

/// Scans one locally stored file.
///
/// Implementations never fail: every problem is folded into
/// [`ScanVerdict::Undetermined`].
#[async_trait]
pub trait MalwareScanner: Send + Sync + std::fmt::Debug + 'static {
    /// Scan the file once. No retries.
    async fn scan(&self, file: &FileRef) -> ScanVerdict;
}
