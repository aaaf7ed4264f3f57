//! # inbound-auth
//!
//! Authentication primitives for Inbound.
//!
//! ## Modules
//!
//! - `jwt`: owner access tokens and guest tokens (HS256)
//! - `password`: Argon2id hashing, plus unusable secrets for guests
//! - `crypto`: authenticated symmetric encryption of tokens
//! - `credential`: guest credential issuance and verification

pub mod credential;
pub mod crypto;
pub mod jwt;
pub mod password;

pub use credential::{CredentialIssuer, EncryptedToken, GuestToken};
pub use crypto::TokenCipher;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenType};
pub use password::PasswordHasher;
