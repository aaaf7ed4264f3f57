//! HTTP scan gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use inbound_core::config::ScannerConfig;
use inbound_core::error::{AppError, ErrorKind};
use inbound_core::traits::MalwareScanner;
use inbound_core::types::{FileRef, ScanFailure, ScanVerdict};

use crate::response;

/// Counts a file handle as open until dropped.
///
/// Moved into the request body stream, so it is released together with
/// the file on every exit path.
#[derive(Debug)]
struct HandleGuard(Arc<AtomicUsize>);

impl HandleGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scans files under a storage root against a ClamAV REST endpoint.
#[derive(Debug, Clone)]
pub struct ScanGateway {
    client: Client,
    endpoint: Option<String>,
    field_name: String,
    root: PathBuf,
    open_handles: Arc<AtomicUsize>,
}

impl ScanGateway {
    /// Build a gateway. `root` is the directory [`FileRef`]s are relative to.
    pub fn new(config: &ScannerConfig, root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build scan client", e)
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint().map(str::to_owned),
            field_name: config.field_name.clone(),
            root: root.into(),
            open_handles: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Whether an endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// File handles currently held by in-flight scans.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Scan one file. Never fails; problems become `Undetermined`.
    pub async fn scan(&self, file: &FileRef) -> ScanVerdict {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!(file = %file, "scanner URL not configured, skipping malware scan");
            return ScanVerdict::Clean;
        };

        match self.scan_remote(endpoint, file).await {
            Ok(verdict) => verdict,
            Err(reason) => {
                match &reason {
                    ScanFailure::FileUnreadable(_) | ScanFailure::InvalidPath(_) => {
                        error!(file = %file, error = %reason, "File not readable for scanning");
                    }
                    ScanFailure::Server { status } => {
                        error!(file = %file, status = *status, "Scanner returned an error status");
                    }
                    ScanFailure::Transport(_) | ScanFailure::Timeout => {
                        error!(file = %file, error = %reason, "Scan request failed");
                    }
                    ScanFailure::MalformedResponse(_) => {
                        error!(file = %file, error = %reason, "Scanner response not understood");
                    }
                }
                ScanVerdict::Undetermined { reason }
            }
        }
    }

    async fn scan_remote(&self, endpoint: &str, file: &FileRef) -> Result<ScanVerdict, ScanFailure> {
        let path = file
            .resolve(&self.root)
            .ok_or_else(|| ScanFailure::InvalidPath(file.to_string()))?;

        let handle = File::open(&path)
            .await
            .map_err(|e| ScanFailure::FileUnreadable(e.to_string()))?;
        let metadata = handle
            .metadata()
            .await
            .map_err(|e| ScanFailure::FileUnreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(ScanFailure::FileUnreadable("not a regular file".into()));
        }

        let guard = HandleGuard::acquire(&self.open_handles);
        let stream = ReaderStream::new(handle).map(move |chunk| {
            let _held = &guard;
            chunk
        });
        let part = Part::stream_with_length(Body::wrap_stream(stream), metadata.len())
            .file_name(file.file_name().to_owned());
        let form = Form::new().part(self.field_name.clone(), part);

        debug!(file = %file, bytes = metadata.len(), "Submitting file for scan");

        let reply = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = reply.status();
        if !status.is_success() {
            return Err(ScanFailure::Server {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = reply.json().await.map_err(|e| {
            if e.is_timeout() {
                ScanFailure::Timeout
            } else {
                ScanFailure::MalformedResponse(e.to_string())
            }
        })?;

        Ok(match response::first_detection(&body)? {
            Some(detection) => {
                warn!(
                    file = %file,
                    entry = detection.name.as_deref().unwrap_or_default(),
                    viruses = ?detection.signatures,
                    "Malware detected"
                );
                ScanVerdict::Infected {
                    signatures: detection.signatures,
                }
            }
            None => ScanVerdict::Clean,
        })
    }
}

fn transport_failure(err: reqwest::Error) -> ScanFailure {
    if err.is_timeout() {
        ScanFailure::Timeout
    } else {
        ScanFailure::Transport(err.to_string())
    }
}

#[async_trait]
impl MalwareScanner for ScanGateway {
    async fn scan(&self, file: &FileRef) -> ScanVerdict {
        ScanGateway::scan(self, file).await
    }
}
