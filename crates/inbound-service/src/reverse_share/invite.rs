//! Invite creation: gate, guest, credential, record, notification.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use inbound_auth::CredentialIssuer;
use inbound_core::error::AppError;
use inbound_core::result::AppResult;
use inbound_core::traits::MailQueue;
use inbound_core::types::{InviteId, MailMessage, MailTemplate, UserId};
use inbound_database::{InviteStore, SettingStore};
use inbound_entity::invite::{CreateReverseShareInvite, ReverseShareInvite};
use inbound_entity::setting::ALLOW_REVERSE_SHARES;

use crate::context::RequestContext;
use crate::guest::GuestProvisioner;

/// Validated input for a new invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInviteRequest {
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient's real email address.
    pub recipient_email: String,
    /// Optional note included in the notification.
    pub message: Option<String>,
}

/// Creates reverse share invites.
#[derive(Clone)]
pub struct InviteService {
    settings: Arc<dyn SettingStore>,
    invites: Arc<dyn InviteStore>,
    provisioner: Arc<GuestProvisioner>,
    issuer: Arc<CredentialIssuer>,
    mail: Arc<dyn MailQueue>,
}

impl std::fmt::Debug for InviteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteService").finish_non_exhaustive()
    }
}

impl InviteService {
    /// Creates a new invite service.
    pub fn new(
        settings: Arc<dyn SettingStore>,
        invites: Arc<dyn InviteStore>,
        provisioner: Arc<GuestProvisioner>,
        issuer: Arc<CredentialIssuer>,
        mail: Arc<dyn MailQueue>,
    ) -> Self {
        Self {
            settings,
            invites,
            provisioner,
            issuer,
            mail,
        }
    }

    /// Whether the reverse share feature is switched on.
    ///
    /// A failed read counts as off.
    pub async fn reverse_shares_allowed(&self) -> bool {
        match self.settings.get(ALLOW_REVERSE_SHARES).await {
            Ok(Some(setting)) => setting.as_bool(),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Could not read reverse share flag, treating as disabled");
                false
            }
        }
    }

    /// Invite a recipient to upload into the owner's space.
    ///
    /// Nothing is written when the feature is off, the caller is anonymous
    /// or no guest credential can be issued. The guest token names this
    /// invite and no other. The notification is queued after the invite is stored;
    /// a queueing failure is logged and does not undo the invite.
    pub async fn create_invite(
        &self,
        owner: Option<&RequestContext>,
        req: CreateInviteRequest,
    ) -> AppResult<ReverseShareInvite> {
        if !self.reverse_shares_allowed().await {
            return Err(AppError::feature_disabled("Reverse shares are not allowed"));
        }
        let owner = owner.ok_or_else(|| AppError::unauthorized("Unauthorized"))?;
        if !self.issuer.is_available() {
            return Err(AppError::credential("Encryption key is not configured"));
        }

        let guest = self
            .provisioner
            .ensure_guest(&req.recipient_email, &req.recipient_name)
            .await?;

        let data = CreateReverseShareInvite::new(
            owner.user_id,
            guest.id,
            req.recipient_name,
            req.recipient_email,
            req.message,
            Utc::now(),
        );
        let token = self
            .issuer
            .issue_for(UserId::from_uuid(guest.id), InviteId::from_uuid(data.id))?;

        let invite = self.invites.create(&data).await?;

        info!(
            invite_id = %invite.id,
            owner_id = %owner.user_id,
            guest_id = %guest.id,
            expires_at = %invite.expires_at,
            "Reverse share invite created"
        );

        let mail = MailMessage {
            recipient: invite.recipient_email.clone(),
            template: MailTemplate::ReverseShareInvite,
            payload: json!({
                "user": { "id": owner.user_id, "name": owner.name },
                "invite": invite,
                "token": token,
            }),
        };
        if let Err(e) = self.mail.enqueue_mail(mail).await {
            error!(invite_id = %invite.id, error = %e, "Failed to queue reverse share invite mail");
        }

        Ok(invite)
    }
}
