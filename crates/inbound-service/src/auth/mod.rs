//! Owner authentication.

pub mod service;

pub use service::{AuthService, LoginResponse};
