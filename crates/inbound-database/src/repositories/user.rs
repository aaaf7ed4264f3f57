//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use inbound_core::error::{AppError, ErrorKind};
use inbound_core::result::AppResult;
use inbound_entity::user::{CreateUser, User};

use crate::connection::db_error;
use crate::store::UserStore;

/// Repository for users and the recipient-to-guest mapping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_guest_for(&self, recipient_email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM guest_recipients g \
             JOIN users u ON u.id = g.guest_user_id \
             WHERE g.recipient_email = LOWER($1)",
        )
        .bind(recipient_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find guest", e))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, is_guest) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.is_guest)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create user", e))
    }

    async fn create_guest(&self, recipient_email: &str, data: &CreateUser) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let guest = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, is_guest) \
             VALUES ($1, $2, $3, TRUE) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create guest", e))?;

        // Blocks on a concurrent claim until it commits, then does nothing.
        let claimed = sqlx::query(
            "INSERT INTO guest_recipients (recipient_email, guest_user_id) \
             VALUES (LOWER($1), $2) ON CONFLICT (recipient_email) DO NOTHING",
        )
        .bind(recipient_email)
        .bind(guest.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to claim recipient", e))?
        .rows_affected();

        if claimed == 1 {
            tx.commit()
                .await
                .map_err(|e| db_error("Failed to commit guest", e))?;
            return Ok(guest);
        }

        tx.rollback()
            .await
            .map_err(|e| db_error("Failed to roll back guest", e))?;

        self.find_guest_for(recipient_email).await?.ok_or_else(|| {
            AppError::database(format!(
                "Recipient claimed but no guest found for '{recipient_email}'"
            ))
        })
    }
}
