//! XChaCha20-Poly1305 token encryption.
//!
//! Wire form is URL-safe base64 (no padding) of `nonce || ciphertext`,
//! with a fresh 24-byte random nonce per encryption.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;

use inbound_core::error::AppError;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

/// Authenticated, reversible encryption keyed by the process-wide secret.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: XChaCha20Poly1305,
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCipher([REDACTED])")
    }
}

impl TokenCipher {
    /// Build from raw key bytes.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(key.into()),
        }
    }

    /// Build from a standard-base64 key of exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, AppError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(AppError::credential("Encryption key is not configured"));
        }
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| AppError::credential(format!("Encryption key is not valid base64: {e}")))?;
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            AppError::credential(format!(
                "Encryption key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::new(&key))
    }

    /// A random key, base64-encoded, suitable for `auth.encryption_key`.
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        STANDARD.encode(key)
    }

    /// Encrypt and encode.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, AppError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|_| AppError::credential("Token encryption failed"))?;

        let mut wire = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        wire.extend_from_slice(&nonce);
        wire.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(wire))
    }

    /// Decode and decrypt. Any tampering or a foreign key fails.
    pub fn decrypt(&self, encoded: &str) -> Result<Vec<u8>, AppError> {
        let wire = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AppError::unauthorized("Malformed encrypted token"))?;
        if wire.len() <= NONCE_LEN {
            return Err(AppError::unauthorized("Malformed encrypted token"));
        }
        let (nonce, ciphertext) = wire.split_at(NONCE_LEN);
        self.cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| AppError::unauthorized("Encrypted token could not be decrypted"))
    }
}
