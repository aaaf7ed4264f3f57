//! Settings repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use inbound_core::error::{AppError, ErrorKind};
use inbound_core::result::AppResult;
use inbound_entity::setting::Setting;

use crate::store::SettingStore;

/// Repository for runtime settings.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for SettingRepository {
    async fn get(&self, key: &str) -> AppResult<Option<Setting>> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<Setting> {
        sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW() \
             RETURNING *",
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))
    }
}
