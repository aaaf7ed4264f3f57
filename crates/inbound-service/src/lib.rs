//! # inbound-service
//!
//! Business logic service layer for Inbound. Each service orchestrates
//! stores, credential issuance, the scanner, and the mail queue to
//! implement one use case.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod context;
pub mod guest;
pub mod reverse_share;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthService, LoginResponse};
pub use context::RequestContext;
pub use guest::GuestProvisioner;
pub use reverse_share::{CreateInviteRequest, GuestUpload, InviteService, UploadReceipt, UploadService};
