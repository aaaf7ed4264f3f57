//! Custom Axum extractors.

pub mod auth;
pub mod validated;

pub use auth::{GuestUser, MaybeAuthUser};
pub use validated::ValidatedJson;
