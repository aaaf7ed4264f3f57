//! Guest credential issuance.

pub mod issuer;

pub use issuer::{CredentialIssuer, EncryptedToken, GuestToken};
