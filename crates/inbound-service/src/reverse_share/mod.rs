//! Reverse shares: owners invite guests to upload into their space.

pub mod invite;
pub mod upload;

pub use invite::{CreateInviteRequest, InviteService};
pub use upload::{GuestUpload, UploadReceipt, UploadService};
