//! Shared harness for the HTTP integration tests.
//!
//! Every test gets fresh in-memory stores, a private storage root and a
//! scanner whose verdict the test controls.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use inbound_api::{AppState, build_app};
use inbound_auth::{CredentialIssuer, PasswordHasher, TokenCipher};
use inbound_core::config::AppConfig;
use inbound_core::traits::MalwareScanner;
use inbound_core::types::{FileRef, InviteId, ScanVerdict, UserId};
use inbound_database::Stores;
use inbound_entity::setting::ALLOW_REVERSE_SHARES;
use inbound_entity::user::CreateUser;
use inbound_worker::{JobQueue, MAIL_QUEUE};

/// Password given to every owner created through the harness.
pub const OWNER_PASSWORD: &str = "correct-horse-battery";

const BOUNDARY: &str = "inbound-test-boundary";

/// Scanner stand-in with a verdict the test can change.
#[derive(Debug)]
pub struct StubScanner {
    verdict: Mutex<ScanVerdict>,
}

impl StubScanner {
    pub async fn set(&self, verdict: ScanVerdict) {
        *self.verdict.lock().await = verdict;
    }
}

#[async_trait]
impl MalwareScanner for StubScanner {
    async fn scan(&self, _file: &FileRef) -> ScanVerdict {
        self.verdict.lock().await.clone()
    }
}

/// A running app plus handles on what sits behind it.
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub scanner: Arc<StubScanner>,
    pub storage: TempDir,
    /// Shares the app's keys, for minting guest tokens directly.
    pub issuer: CredentialIssuer,
}

impl TestApp {
    /// App with reverse shares enabled.
    pub async fn new() -> Self {
        let app = Self::with_config(AppConfig::default()).await;
        app.allow_reverse_shares(true).await;
        app
    }

    /// App built from `config`, with the storage root and key filled in.
    /// The reverse share flag is left unset.
    pub async fn with_config(mut config: AppConfig) -> Self {
        let storage = TempDir::new().expect("Failed to create storage dir");
        config.storage.data_root = storage.path().display().to_string();
        if config.auth.encryption_key.is_empty() {
            config.auth.encryption_key = TokenCipher::generate_key();
        }
        config.auth.jwt_secret = "integration-test-secret".into();

        let issuer = CredentialIssuer::new(&config.auth);
        let stores = Stores::memory();
        let scanner = Arc::new(StubScanner {
            verdict: Mutex::new(ScanVerdict::Clean),
        });
        let mail = Arc::new(JobQueue::new(
            Arc::clone(&stores.jobs),
            "test-worker".into(),
            config.worker.max_attempts,
        ));

        let state = AppState::new(config, stores.clone(), scanner.clone(), mail);
        let router = build_app(state);

        Self {
            router,
            stores,
            scanner,
            storage,
            issuer,
        }
    }

    pub async fn allow_reverse_shares(&self, allow: bool) {
        self.stores
            .settings
            .set(ALLOW_REVERSE_SHARES, if allow { "true" } else { "false" })
            .await
            .expect("Failed to set flag");
    }

    /// Create a full account and return its id.
    pub async fn create_owner(&self, name: &str, email: &str) -> Uuid {
        let hash = PasswordHasher::new()
            .hash_password(OWNER_PASSWORD)
            .expect("Failed to hash password");
        self.stores
            .users
            .create(&CreateUser {
                name: name.into(),
                email: email.into(),
                password_hash: hash,
                is_guest: false,
            })
            .await
            .expect("Failed to create owner")
            .id
    }

    /// Log in and return the access token.
    pub async fn login(&self, email: &str) -> String {
        let resp = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": OWNER_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.body);
        resp.body["data"]["access_token"]
            .as_str()
            .expect("No access token")
            .to_string()
    }

    /// Owner account plus its access token.
    pub async fn owner(&self) -> (Uuid, String) {
        let id = self.create_owner("Olivia Owner", "olivia@example.com").await;
        let token = self.login("olivia@example.com").await;
        (id, token)
    }

    /// Invite `email` as the given owner.
    pub async fn invite(&self, token: &str, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({
                "recipient_name": "Gus Guest",
                "recipient_email": email,
                "message": "Please upload the signed contract",
            })),
            Some(token),
        )
        .await
    }

    /// Claim the next queued mail job and return its payload.
    pub async fn next_mail(&self) -> Option<Value> {
        self.stores
            .jobs
            .claim_next(MAIL_QUEUE, "test-reader")
            .await
            .expect("Failed to claim mail job")
            .map(|job| job.payload)
    }

    /// Guest token carried by the next queued invite mail.
    pub async fn guest_token(&self) -> String {
        let mail = self.next_mail().await.expect("No invite mail queued");
        mail["payload"]["token"]
            .as_str()
            .expect("No token in invite mail")
            .to_string()
    }

    /// Encrypted guest token for `guest_id` on `invite_id`, bypassing the
    /// invite flow.
    pub fn issue_guest_token(&self, guest_id: Uuid, invite_id: Uuid) -> String {
        self.issuer
            .issue_for(UserId::from_uuid(guest_id), InviteId::from_uuid(invite_id))
            .expect("Failed to issue guest token")
            .to_string()
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as the multipart field `field`.
    pub async fn upload(
        &self,
        token: Option<&str>,
        field: &str,
        file_name: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri("/api/reverse-shares/uploads")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
