//! JWT token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use inbound_core::config::AuthConfig;
use inbound_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Creates signed JWT access and guest tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    guest_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("guest_ttl", &self.guest_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.jwt_access_ttl_minutes as i64),
            guest_ttl: Duration::days(config.guest_token_ttl_days),
        }
    }

    /// Signs an owner access token.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.sign(user_id, Some(name.to_string()), TokenType::Access, None, self.access_ttl)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }

    /// Signs a guest token bound to one invite. Always a new token with a
    /// fresh `jti`.
    pub fn generate_guest_token(
        &self,
        guest_id: Uuid,
        invite_id: Uuid,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.sign(guest_id, None, TokenType::Guest, Some(invite_id), self.guest_ttl)
            .map_err(|e| AppError::credential(format!("Failed to sign guest token: {e}")))
    }

    fn sign(
        &self,
        sub: Uuid,
        name: Option<String>,
        token_type: TokenType,
        invite_id: Option<Uuid>,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + ttl;
        let claims = Claims {
            sub,
            name,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
            invite_id,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, exp))
    }
}
