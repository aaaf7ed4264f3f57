//! Convenience result type alias for Inbound.

use crate::error::AppError;

/// A specialized `Result` type for Inbound operations.
pub type AppResult<T> = Result<T, AppError>;
