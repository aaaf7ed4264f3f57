//! Core type definitions used across the Inbound workspace.

pub mod file;
pub mod id;
pub mod mail;
pub mod scan;

pub use file::FileRef;
pub use id::*;
pub use mail::{MailMessage, MailTemplate};
pub use scan::{ScanFailure, ScanVerdict};
