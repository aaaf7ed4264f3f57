//! Reverse share invite repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use inbound_core::error::{AppError, ErrorKind};
use inbound_core::result::AppResult;
use inbound_entity::invite::{CreateReverseShareInvite, ReverseShareInvite};

use crate::connection::db_error;
use crate::store::InviteStore;

/// Repository for reverse share invites.
#[derive(Debug, Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Create a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteStore for InviteRepository {
    async fn create(&self, data: &CreateReverseShareInvite) -> AppResult<ReverseShareInvite> {
        sqlx::query_as::<_, ReverseShareInvite>(
            "INSERT INTO reverse_share_invites \
             (id, user_id, guest_user_id, recipient_name, recipient_email, message, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.guest_user_id)
        .bind(&data.recipient_name)
        .bind(&data.recipient_email)
        .bind(&data.message)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create invite", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ReverseShareInvite>> {
        sqlx::query_as::<_, ReverseShareInvite>("SELECT * FROM reverse_share_invites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find invite", e))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<ReverseShareInvite>> {
        sqlx::query_as::<_, ReverseShareInvite>(
            "SELECT * FROM reverse_share_invites WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list invites", e))
    }
}
