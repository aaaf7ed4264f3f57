//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An account: either a real owner or a placeholder guest.
///
/// A guest's `email` is a random, undeliverable placeholder that only
/// satisfies the uniqueness constraint. It is never used for mail or login.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Real address for owners, placeholder for guests.
    pub email: String,
    /// Argon2 password hash. Unusable for guests.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether this is a non-login guest identity.
    pub is_guest: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Guests can never log in.
    pub fn can_login(&self) -> bool {
        !self.is_guest
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email address (placeholder for guests).
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Guest flag.
    pub is_guest: bool,
}
