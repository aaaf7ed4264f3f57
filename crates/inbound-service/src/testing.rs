//! Fakes and fixtures shared by the service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use inbound_auth::{CredentialIssuer, PasswordHasher, TokenCipher};
use inbound_core::config::{AccountMatch, AuthConfig};
use inbound_core::error::AppError;
use inbound_core::result::AppResult;
use inbound_core::traits::{MailQueue, MalwareScanner};
use inbound_core::types::{FileRef, JobId, MailMessage, ScanVerdict};
use inbound_database::memory::MemoryUserStore;
use inbound_database::{InviteStore, Stores, UserStore};
use inbound_entity::invite::{CreateReverseShareInvite, ReverseShareInvite};
use inbound_entity::setting::ALLOW_REVERSE_SHARES;
use inbound_entity::user::{CreateUser, User};

use crate::context::RequestContext;
use crate::guest::GuestProvisioner;
use crate::reverse_share::{CreateInviteRequest, InviteService};

/// Records queued mail; can be told to fail the next enqueue.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    sent: Mutex<Vec<MailMessage>>,
    fail_next: Mutex<bool>,
}

impl RecordingQueue {
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn fail_next(&self) {
        *self.fail_next.lock().await = true;
    }
}

#[async_trait]
impl MailQueue for RecordingQueue {
    async fn enqueue_mail(&self, mail: MailMessage) -> AppResult<JobId> {
        let mut fail = self.fail_next.lock().await;
        if *fail {
            *fail = false;
            return Err(AppError::database("queue unavailable"));
        }
        self.sent.lock().await.push(mail);
        Ok(JobId::new())
    }
}

/// Returns a fixed verdict and remembers what it was asked to scan.
#[derive(Debug)]
pub struct FakeScanner {
    verdict: ScanVerdict,
    scanned: Mutex<Vec<FileRef>>,
}

impl FakeScanner {
    pub fn new(verdict: ScanVerdict) -> Self {
        Self {
            verdict,
            scanned: Mutex::new(Vec::new()),
        }
    }

    pub async fn scanned(&self) -> Vec<FileRef> {
        self.scanned.lock().await.clone()
    }
}

#[async_trait]
impl MalwareScanner for FakeScanner {
    async fn scan(&self, file: &FileRef) -> ScanVerdict {
        self.scanned.lock().await.push(file.clone());
        self.verdict.clone()
    }
}

/// User store whose first `failures` guest inserts report a conflict.
#[derive(Debug)]
pub struct FlakyUsers {
    inner: MemoryUserStore,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyUsers {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryUserStore::new(),
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for FlakyUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_guest_for(&self, recipient_email: &str) -> AppResult<Option<User>> {
        self.inner.find_guest_for(recipient_email).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        self.inner.create(data).await
    }

    async fn create_guest(&self, recipient_email: &str, data: &CreateUser) -> AppResult<User> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(AppError::conflict("placeholder taken"));
        }
        self.inner.create_guest(recipient_email, data).await
    }
}

/// Insert a full account.
pub async fn owner(users: &dyn UserStore, email: &str) -> User {
    users
        .create(&CreateUser {
            name: "Owner".into(),
            email: email.into(),
            password_hash: "hash".into(),
            is_guest: false,
        })
        .await
        .unwrap()
}

/// Insert an invite for a fresh guest id.
pub async fn invite_for(
    invites: &dyn InviteStore,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
) -> ReverseShareInvite {
    invite_for_guest(invites, owner_id, Uuid::new_v4(), created_at).await
}

/// Insert an invite from `owner_id` to `guest_id`.
pub async fn invite_for_guest(
    invites: &dyn InviteStore,
    owner_id: Uuid,
    guest_id: Uuid,
    created_at: DateTime<Utc>,
) -> ReverseShareInvite {
    invites
        .create(&CreateReverseShareInvite::new(
            owner_id,
            guest_id,
            "Guest",
            "guest@example.com",
            None,
            created_at,
        ))
        .await
        .unwrap()
}

pub fn request(email: &str) -> CreateInviteRequest {
    CreateInviteRequest {
        recipient_name: "Guest".into(),
        recipient_email: email.into(),
        message: Some("Please send the files".into()),
    }
}

/// Invite service wired over memory stores.
pub struct Harness {
    pub stores: Stores,
    pub invites: InviteService,
    pub issuer: Arc<CredentialIssuer>,
    pub mail: Arc<RecordingQueue>,
}

impl Harness {
    pub async fn new(allow: bool) -> Self {
        Self::with_encryption_key(&TokenCipher::generate_key(), allow).await
    }

    pub async fn without_flag() -> Self {
        Self::build(&TokenCipher::generate_key(), None).await
    }

    pub async fn with_encryption_key(key: &str, allow: bool) -> Self {
        Self::build(key, Some(allow)).await
    }

    async fn build(key: &str, allow: Option<bool>) -> Self {
        let stores = Stores::memory();
        if let Some(allow) = allow {
            stores
                .settings
                .set(ALLOW_REVERSE_SHARES, if allow { "true" } else { "false" })
                .await
                .unwrap();
        }
        let config = AuthConfig {
            encryption_key: key.to_string(),
            ..AuthConfig::default()
        };
        let issuer = Arc::new(CredentialIssuer::new(&config));
        let mail = Arc::new(RecordingQueue::default());
        let provisioner = Arc::new(GuestProvisioner::new(
            stores.users.clone(),
            Arc::new(PasswordHasher::new()),
            AccountMatch::Any,
        ));
        let invites = InviteService::new(
            stores.settings.clone(),
            stores.invites.clone(),
            provisioner,
            issuer.clone(),
            mail.clone(),
        );
        Self {
            stores,
            invites,
            issuer,
            mail,
        }
    }

    pub async fn owner_context(&self) -> RequestContext {
        let user = owner(self.stores.users.as_ref(), "owner@example.com").await;
        RequestContext::new(user.id, user.name)
    }

    pub async fn invite_rows(&self, owner_id: Uuid) -> Vec<ReverseShareInvite> {
        self.stores.invites.list_for_owner(owner_id).await.unwrap()
    }
}
