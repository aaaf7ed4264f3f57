//! Mints guest tokens and hands them out only in encrypted form.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use inbound_core::config::AuthConfig;
use inbound_core::error::AppError;
use inbound_core::types::{InviteId, UserId};

use crate::crypto::TokenCipher;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder};

/// Plaintext guest token. Never serialized, never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct GuestToken(String);

impl GuestToken {
    /// The signed token string.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GuestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuestToken([REDACTED])")
    }
}

/// The only form of a guest token that leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedToken(String);

impl EncryptedToken {
    /// Wrap a value received from a client.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The encoded ciphertext.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncryptedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and verifies guest credentials.
///
/// Built once at startup from [`AuthConfig`]. A missing or malformed
/// encryption key does not prevent construction; every issuance then
/// fails with a `Credential` error.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    cipher: Option<TokenCipher>,
}

impl CredentialIssuer {
    /// Build from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let cipher = match TokenCipher::from_base64(&config.encryption_key) {
            Ok(cipher) => Some(cipher),
            Err(e) => {
                warn!(error = %e.message, "Guest credential issuance disabled");
                None
            }
        };
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            cipher,
        }
    }

    /// Whether a usable encryption key is loaded.
    pub fn is_available(&self) -> bool {
        self.cipher.is_some()
    }

    /// Mint a new token for `guest_id`, scoped to `invite_id`, and return
    /// it encrypted.
    ///
    /// Never reuses a previous token.
    pub fn issue_for(
        &self,
        guest_id: UserId,
        invite_id: InviteId,
    ) -> Result<EncryptedToken, AppError> {
        let cipher = self.cipher()?;
        let (token, _expires_at) = self
            .encoder
            .generate_guest_token(guest_id.into_uuid(), invite_id.into_uuid())?;
        cipher.encrypt(token.as_bytes()).map(EncryptedToken)
    }

    /// Decrypt without validating the token.
    pub fn reveal(&self, encrypted: &EncryptedToken) -> Result<GuestToken, AppError> {
        let plaintext = self.cipher()?.decrypt(encrypted.as_str())?;
        String::from_utf8(plaintext)
            .map(GuestToken)
            .map_err(|_| AppError::unauthorized("Encrypted token is not valid UTF-8"))
    }

    /// Decrypt and validate, returning the guest claims.
    pub fn verify(&self, encrypted: &EncryptedToken) -> Result<Claims, AppError> {
        let token = self
            .reveal(encrypted)
            .map_err(|e| AppError::unauthorized(e.message))?;
        self.decoder.decode_guest_token(token.expose())
    }

    fn cipher(&self) -> Result<&TokenCipher, AppError> {
        self.cipher
            .as_ref()
            .ok_or_else(|| AppError::credential("Encryption key is not configured"))
    }
}
