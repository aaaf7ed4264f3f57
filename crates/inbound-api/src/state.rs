//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use inbound_auth::{CredentialIssuer, JwtDecoder, JwtEncoder, PasswordHasher};
use inbound_core::config::AppConfig;
use inbound_core::traits::{MailQueue, MalwareScanner};
use inbound_database::Stores;
use inbound_service::{AuthService, GuestProvisioner, InviteService, UploadService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Stores selected by `database.url`
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token decoder
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Guest credential issuer and verifier
    pub credential_issuer: Arc<CredentialIssuer>,

    // ── Services ─────────────────────────────────────────────
    /// Owner login
    pub auth_service: Arc<AuthService>,
    /// Reverse share invites
    pub invite_service: Arc<InviteService>,
    /// Guest uploads
    pub upload_service: Arc<UploadService>,
}

impl AppState {
    /// Wire every service from configuration and its external collaborators.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        scanner: Arc<dyn MalwareScanner>,
        mail: Arc<dyn MailQueue>,
    ) -> Self {
        let password_hasher = Arc::new(PasswordHasher::new());
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let credential_issuer = Arc::new(CredentialIssuer::new(&config.auth));

        let provisioner = Arc::new(GuestProvisioner::new(
            Arc::clone(&stores.users),
            Arc::clone(&password_hasher),
            config.reverse_share.account_match,
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            Arc::clone(&password_hasher),
            jwt_encoder,
        ));
        let invite_service = Arc::new(InviteService::new(
            Arc::clone(&stores.settings),
            Arc::clone(&stores.invites),
            provisioner,
            Arc::clone(&credential_issuer),
            mail,
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&stores.invites),
            scanner,
            config.storage.root(),
            config.storage.max_upload_size_bytes,
        ));

        Self {
            config: Arc::new(config),
            stores,
            jwt_decoder,
            credential_issuer,
            auth_service,
            invite_service,
            upload_service,
        }
    }
}
