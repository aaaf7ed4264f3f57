//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use inbound_core::error::AppError;
use inbound_core::result::AppResult;
use inbound_entity::user::{CreateUser, User};

use crate::store::UserStore;

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    /// Lowercased recipient address to guest id.
    guest_recipients: HashMap<String, Uuid>,
}

impl State {
    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn insert(&mut self, data: &CreateUser, is_guest: bool) -> AppResult<User> {
        if self.email_taken(&data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' already exists",
                data.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            is_guest,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// User store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    state: Mutex<State>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.lock().await.users.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_guest_for(&self, recipient_email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .guest_recipients
            .get(&recipient_email.to_lowercase())
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        self.state.lock().await.insert(data, data.is_guest)
    }

    async fn create_guest(&self, recipient_email: &str, data: &CreateUser) -> AppResult<User> {
        let key = recipient_email.to_lowercase();
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .guest_recipients
            .get(&key)
            .and_then(|id| state.users.get(id))
        {
            return Ok(existing.clone());
        }
        let guest = state.insert(data, true)?;
        state.guest_recipients.insert(key, guest.id);
        Ok(guest)
    }
}
