//! In-memory invite store.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use inbound_core::result::AppResult;
use inbound_entity::invite::{CreateReverseShareInvite, ReverseShareInvite};

use crate::store::InviteStore;

/// Invite store backed by a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct MemoryInviteStore {
    invites: Mutex<Vec<ReverseShareInvite>>,
}

impl MemoryInviteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invites.
    pub async fn len(&self) -> usize {
        self.invites.lock().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl InviteStore for MemoryInviteStore {
    async fn create(&self, data: &CreateReverseShareInvite) -> AppResult<ReverseShareInvite> {
        let invite = ReverseShareInvite {
            id: data.id,
            user_id: data.user_id,
            guest_user_id: data.guest_user_id,
            recipient_name: data.recipient_name.clone(),
            recipient_email: data.recipient_email.clone(),
            message: data.message.clone(),
            created_at: data.created_at,
            expires_at: data.expires_at,
        };
        self.invites.lock().await.push(invite.clone());
        Ok(invite)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ReverseShareInvite>> {
        let invites = self.invites.lock().await;
        Ok(invites.iter().find(|i| i.id == id).cloned())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<ReverseShareInvite>> {
        let invites = self.invites.lock().await;
        let mut owned: Vec<_> = invites
            .iter()
            .filter(|i| i.user_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}
