//! Owner login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use inbound_auth::{JwtEncoder, PasswordHasher};
use inbound_core::error::AppError;
use inbound_core::result::AppResult;
use inbound_database::UserStore;

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for owner endpoints.
    pub access_token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Authenticates owners. Guests always fail.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
        }
    }

    /// Exchange email and password for an access token.
    ///
    /// Unknown addresses, wrong passwords, and guest accounts all produce
    /// the same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !user.can_login() {
            warn!(user_id = %user.id, "Login attempt for guest account");
            return Err(invalid());
        }

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid());
        }

        let (access_token, expires_at) = self.encoder.generate_access_token(user.id, &user.name)?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            access_token,
            expires_at,
        })
    }
}
