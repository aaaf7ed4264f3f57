//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use inbound_service::CreateInviteRequest;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Reverse share invite request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InviteRequest {
    /// Recipient display name.
    #[validate(length(
        min = 1,
        max = 255,
        message = "The recipient name field is required and may not be greater than 255 characters."
    ))]
    pub recipient_name: String,
    /// Recipient's real address.
    #[validate(
        email(message = "The recipient email must be a valid email address."),
        length(max = 255, message = "The recipient email may not be greater than 255 characters.")
    )]
    pub recipient_email: String,
    /// Optional note for the recipient.
    #[serde(default)]
    pub message: Option<String>,
}

impl From<InviteRequest> for CreateInviteRequest {
    fn from(req: InviteRequest) -> Self {
        Self {
            recipient_name: req.recipient_name,
            recipient_email: req.recipient_email,
            message: req.message,
        }
    }
}
