//! Guest uploads into a reverse share.
//!
//! Bytes are staged under `temp/`, scanned, and only moved into the
//! owner's space once the scanner reports them clean.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use inbound_core::error::{AppError, ErrorKind};
use inbound_core::result::AppResult;
use inbound_core::traits::MalwareScanner;
use inbound_core::types::{FileRef, ScanVerdict};
use inbound_database::InviteStore;

/// Longest stored file name in bytes.
const MAX_FILE_NAME_LEN: usize = 255;

/// Bytes taken by the `-xxxxxxxx` tag added on a name collision.
const COLLISION_TAG_LEN: usize = 9;

/// Longest extension carried onto the staged copy.
const MAX_EXTENSION_LEN: usize = 16;

/// A file received from a guest.
#[derive(Debug, Clone)]
pub struct GuestUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// File contents.
    pub data: Bytes,
}

/// What the guest gets back for an accepted upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Invite the upload was filed under.
    pub invite_id: Uuid,
    /// Stored file name.
    pub file_name: String,
    /// Path relative to the storage root.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Scan outcome label.
    pub verdict: String,
}

/// Accepts guest uploads for the invite a guest token was issued for.
#[derive(Clone)]
pub struct UploadService {
    invites: Arc<dyn InviteStore>,
    scanner: Arc<dyn MalwareScanner>,
    root: PathBuf,
    max_upload_size: u64,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("scanner", &self.scanner)
            .field("root", &self.root)
            .field("max_upload_size", &self.max_upload_size)
            .finish_non_exhaustive()
    }
}

impl UploadService {
    /// Creates a new upload service rooted at `root`.
    pub fn new(
        invites: Arc<dyn InviteStore>,
        scanner: Arc<dyn MalwareScanner>,
        root: PathBuf,
        max_upload_size: u64,
    ) -> Self {
        Self {
            invites,
            scanner,
            root,
            max_upload_size,
        }
    }

    /// Store a guest's file once it scans clean.
    ///
    /// `guest_id` and `invite_id` come from a verified guest token. The
    /// invite must belong to that guest and still be open. Infected files
    /// are `Rejected`; files the scanner could not judge are
    /// `ServiceUnavailable`. Neither leaves anything on disk.
    pub async fn accept(
        &self,
        guest_id: Uuid,
        invite_id: Uuid,
        upload: GuestUpload,
    ) -> AppResult<UploadReceipt> {
        let size = upload.data.len() as u64;
        if size == 0 {
            return Err(AppError::validation("File is empty"));
        }
        if size > self.max_upload_size {
            return Err(AppError::validation(format!(
                "File size {} exceeds maximum {}",
                size, self.max_upload_size
            )));
        }

        let invite = self
            .invites
            .find_by_id(invite_id)
            .await?
            .filter(|invite| invite.guest_user_id == guest_id && !invite.is_expired(Utc::now()))
            .ok_or_else(|| AppError::forbidden("No active reverse share invite"))?;

        let file_name = sanitize_file_name(&upload.file_name);
        let staged = FileRef::new(format!(
            "temp/{}/{}{}",
            guest_id,
            Uuid::new_v4(),
            extension_suffix(&file_name)
        ));
        let staged_path = self.resolve(&staged)?;
        write_file(&staged_path, &upload.data).await?;

        let verdict = self.scanner.scan(&staged).await;
        match verdict {
            ScanVerdict::Clean => {}
            ScanVerdict::Infected { signatures } => {
                discard(&staged_path).await;
                warn!(
                    invite_id = %invite.id,
                    guest_id = %guest_id,
                    signatures = ?signatures,
                    "Guest upload rejected by malware scan"
                );
                return Err(AppError::rejected("File failed the malware scan")
                    .with_details(json!({ "signatures": signatures })));
            }
            ScanVerdict::Undetermined { reason } => {
                discard(&staged_path).await;
                warn!(invite_id = %invite.id, reason = %reason, "Guest upload could not be scanned");
                return Err(AppError::service_unavailable(
                    "File could not be scanned, try again later",
                ));
            }
        }

        let dir = format!("reverse-shares/{}/{}", invite.user_id, invite.id);
        let (relative, final_path) = self.free_target(&dir, &file_name).await?;
        if let Some(parent) = final_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if let Err(e) = tokio::fs::rename(&staged_path, &final_path).await {
            discard(&staged_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                "Failed to move upload into place",
                e,
            ));
        }

        info!(
            invite_id = %invite.id,
            owner_id = %invite.user_id,
            guest_id = %guest_id,
            path = %relative,
            size = size,
            "Guest upload accepted"
        );

        Ok(UploadReceipt {
            invite_id: invite.id,
            file_name,
            path: relative,
            size_bytes: size,
            verdict: ScanVerdict::Clean.label().to_string(),
        })
    }

    fn resolve(&self, file: &FileRef) -> AppResult<PathBuf> {
        file.resolve(&self.root)
            .ok_or_else(|| AppError::internal(format!("Invalid storage path '{file}'")))
    }

    /// First `dir/name` that does not exist yet, adding a short suffix on
    /// collision.
    async fn free_target(&self, dir: &str, file_name: &str) -> AppResult<(String, PathBuf)> {
        let relative = format!("{dir}/{file_name}");
        let path = self.resolve(&FileRef::new(relative.as_str()))?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok((relative, path));
        }

        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
            _ => (file_name, String::new()),
        };
        let tag = Uuid::new_v4().simple().to_string();
        let relative = format!("{dir}/{stem}-{}{ext}", &tag[..8]);
        let path = self.resolve(&FileRef::new(relative.as_str()))?;
        Ok((relative, path))
    }
}

async fn write_file(path: &Path, data: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to stage upload", e))
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
    }
}

/// Reduce a client file name to a safe single path component.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() => c,
            '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        return "upload".to_string();
    }
    fit_name(trimmed, MAX_FILE_NAME_LEN - COLLISION_TAG_LEN)
}

/// Shorten `name` to at most `max` bytes, cutting the stem and keeping a
/// short extension.
fn fit_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_EXTENSION_LEN => {
            &name[stem.len()..]
        }
        _ => "",
    };
    let stem = &name[..name.len() - ext.len()];
    format!("{}{}", truncate_bytes(stem, max - ext.len()), ext)
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn truncate_bytes(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn extension_suffix(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}
