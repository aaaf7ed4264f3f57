//! Response DTOs.

use serde::{Deserialize, Serialize};

use inbound_entity::invite::ReverseShareInvite;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `"success"`.
    pub status: String,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Created invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    /// The stored invite record.
    pub invite: ReverseShareInvite,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the stores answer.
    pub status: String,
    /// Server version.
    pub version: String,
}
