//! # inbound-core
//!
//! Core crate for Inbound. Contains configuration schemas, typed
//! identifiers, the seam traits implemented by the scanner and worker
//! crates, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Inbound crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
