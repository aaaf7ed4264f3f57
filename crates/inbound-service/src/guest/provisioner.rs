//! Resolves a recipient address to the guest identity that will own the
//! upload credential.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info};

use inbound_auth::PasswordHasher;
use inbound_core::config::AccountMatch;
use inbound_core::result::AppResult;
use inbound_database::UserStore;
use inbound_entity::user::{CreateUser, User};

/// Length of the random placeholder stored as a guest's email.
pub const PLACEHOLDER_LEN: usize = 20;

/// Placeholder collisions tolerated before giving up.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Finds or creates the guest account for a recipient.
#[derive(Clone)]
pub struct GuestProvisioner {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    account_match: AccountMatch,
}

impl std::fmt::Debug for GuestProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestProvisioner")
            .field("account_match", &self.account_match)
            .finish_non_exhaustive()
    }
}

impl GuestProvisioner {
    /// Creates a new provisioner.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        account_match: AccountMatch,
    ) -> Self {
        Self {
            users,
            hasher,
            account_match,
        }
    }

    /// Return the guest for `recipient_email`, creating one on first use.
    ///
    /// Repeated calls for the same address yield the same account, and
    /// concurrent first calls converge on a single guest.
    pub async fn ensure_guest(&self, recipient_email: &str, recipient_name: &str) -> AppResult<User> {
        if let Some(user) = self.match_existing_account(recipient_email).await? {
            debug!(user_id = %user.id, is_guest = user.is_guest, "Reusing existing account for recipient");
            return Ok(user);
        }

        if let Some(guest) = self.users.find_guest_for(recipient_email).await? {
            return Ok(guest);
        }

        let mut attempt = 1;
        loop {
            let data = CreateUser {
                name: recipient_name.to_string(),
                email: placeholder(),
                password_hash: self.hasher.hash_unusable()?,
                is_guest: true,
            };

            match self.users.create_guest(recipient_email, &data).await {
                Ok(guest) => {
                    info!(guest_id = %guest.id, "Guest identity ready");
                    return Ok(guest);
                }
                Err(e) if e.is_conflict() && attempt < MAX_CREATE_ATTEMPTS => {
                    debug!(attempt, "Guest placeholder collided, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// The only place that decides whether an existing account may act as
    /// the guest for an address.
    async fn match_existing_account(&self, recipient_email: &str) -> AppResult<Option<User>> {
        let found = self.users.find_by_email(recipient_email).await?;
        Ok(match self.account_match {
            AccountMatch::Any => found,
            AccountMatch::GuestsOnly => found.filter(|user| user.is_guest),
        })
    }
}

fn placeholder() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PLACEHOLDER_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FlakyUsers, owner};
    use inbound_database::memory::MemoryUserStore;

    fn provisioner(users: Arc<dyn UserStore>, account_match: AccountMatch) -> GuestProvisioner {
        GuestProvisioner::new(users, Arc::new(PasswordHasher::new()), account_match)
    }

    #[tokio::test]
    async fn test_new_recipient_gets_guest_with_placeholder() {
        let users = Arc::new(MemoryUserStore::new());
        let p = provisioner(users.clone(), AccountMatch::Any);

        let guest = p.ensure_guest("ann@example.com", "Ann").await.unwrap();

        assert!(guest.is_guest);
        assert!(!guest.can_login());
        assert_eq!(guest.name, "Ann");
        assert_eq!(guest.email.len(), PLACEHOLDER_LEN);
        assert_ne!(guest.email, "ann@example.com");
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_same_recipient_reuses_guest() {
        let users = Arc::new(MemoryUserStore::new());
        let p = provisioner(users.clone(), AccountMatch::Any);

        let first = p.ensure_guest("ann@example.com", "Ann").await.unwrap();
        let second = p.ensure_guest("ANN@example.com", "Annie").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_converge() {
        let users = Arc::new(MemoryUserStore::new());
        let p = provisioner(users.clone(), AccountMatch::Any);

        let (a, b) = tokio::join!(
            p.ensure_guest("bob@example.com", "Bob"),
            p.ensure_guest("bob@example.com", "Bob"),
        );

        assert_eq!(a.unwrap().id, b.unwrap().id);
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_any_policy_reuses_full_account() {
        let users = Arc::new(MemoryUserStore::new());
        let existing = owner(users.as_ref(), "carol@example.com").await;
        let p = provisioner(users.clone(), AccountMatch::Any);

        let resolved = p.ensure_guest("carol@example.com", "Carol").await.unwrap();

        assert_eq!(resolved.id, existing.id);
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_guests_only_policy_skips_full_account() {
        let users = Arc::new(MemoryUserStore::new());
        let existing = owner(users.as_ref(), "carol@example.com").await;
        let p = provisioner(users.clone(), AccountMatch::GuestsOnly);

        let resolved = p.ensure_guest("carol@example.com", "Carol").await.unwrap();

        assert_ne!(resolved.id, existing.id);
        assert!(resolved.is_guest);
        assert_eq!(users.len().await, 2);
    }

    #[tokio::test]
    async fn test_placeholder_collision_is_retried() {
        let users = Arc::new(FlakyUsers::new(2));
        let p = provisioner(users.clone(), AccountMatch::Any);

        let guest = p.ensure_guest("dan@example.com", "Dan").await.unwrap();

        assert!(guest.is_guest);
        assert_eq!(users.create_calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_repeated_collisions() {
        let users = Arc::new(FlakyUsers::new(10));
        let p = provisioner(users.clone(), AccountMatch::Any);

        let err = p.ensure_guest("dan@example.com", "Dan").await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(users.create_calls(), MAX_CREATE_ATTEMPTS);
    }
}
