//! Symmetric encryption of credentials.

pub mod cipher;

pub use cipher::TokenCipher;
