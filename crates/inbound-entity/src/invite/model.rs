//! Reverse share invite model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fixed invite lifetime.
pub const INVITE_TTL_DAYS: i64 = 7;

/// One outstanding invitation for a guest to upload into an owner's space.
///
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReverseShareInvite {
    /// Unique invite identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Guest identity the credential is bound to.
    pub guest_user_id: Uuid,
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient's real email address.
    pub recipient_email: String,
    /// Optional note from the owner.
    pub message: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Always `created_at + INVITE_TTL_DAYS`.
    pub expires_at: DateTime<Utc>,
}

impl ReverseShareInvite {
    /// Whether the invite has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Data required to create an invite. Expiry is derived, never supplied.
///
/// The id is assigned up front so a guest credential can be bound to the
/// invite before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReverseShareInvite {
    /// Invite identifier to insert.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Guest identity.
    pub guest_user_id: Uuid,
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient's real email address.
    pub recipient_email: String,
    /// Optional note.
    pub message: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl CreateReverseShareInvite {
    /// Build an invite created at `now` that expires seven days later.
    pub fn new(
        user_id: Uuid,
        guest_user_id: Uuid,
        recipient_name: impl Into<String>,
        recipient_email: impl Into<String>,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            guest_user_id,
            recipient_name: recipient_name.into(),
            recipient_email: recipient_email.into(),
            message,
            created_at: now,
            expires_at: now + Duration::days(INVITE_TTL_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_exactly_seven_days() {
        let now = Utc::now();
        let data = CreateReverseShareInvite::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ann",
            "a@x.com",
            None,
            now,
        );
        assert_eq!(data.expires_at - data.created_at, Duration::days(7));
    }

    #[test]
    fn test_each_new_invite_gets_its_own_id() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let a = CreateReverseShareInvite::new(owner, guest, "Ann", "a@x.com", None, now);
        let b = CreateReverseShareInvite::new(owner, guest, "Ann", "a@x.com", None, now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let now = Utc::now();
        let data = CreateReverseShareInvite::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ann",
            "a@x.com",
            Some("hi".into()),
            now,
        );
        let invite = ReverseShareInvite {
            id: data.id,
            user_id: data.user_id,
            guest_user_id: data.guest_user_id,
            recipient_name: data.recipient_name,
            recipient_email: data.recipient_email,
            message: data.message,
            created_at: data.created_at,
            expires_at: data.expires_at,
        };
        assert!(!invite.is_expired(now + Duration::days(6)));
        assert!(invite.is_expired(now + Duration::days(7)));
    }
}
