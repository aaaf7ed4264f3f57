//! Store bundle selected from configuration.

use std::sync::Arc;

use tracing::info;

use inbound_core::config::DatabaseConfig;
use inbound_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryInviteStore, MemoryJobStore, MemorySettingStore, MemoryUserStore};
use crate::repositories::{InviteRepository, JobRepository, SettingRepository, UserRepository};
use crate::store::{InviteStore, JobStore, SettingStore, UserStore};

/// Every store the services need, backed by one implementation.
#[derive(Clone)]
pub struct Stores {
    /// Users and guest mapping.
    pub users: Arc<dyn UserStore>,
    /// Reverse share invites.
    pub invites: Arc<dyn InviteStore>,
    /// Runtime settings (feature flags).
    pub settings: Arc<dyn SettingStore>,
    /// Background jobs.
    pub jobs: Arc<dyn JobStore>,
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Connect to the backend named by `config.url`.
    ///
    /// `memory://` yields fresh in-process stores; anything else is treated
    /// as a PostgreSQL URL. Migrations are not run here.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory stores");
            return Ok(Self::memory());
        }
        let pool = DatabasePool::connect(config).await?;
        Ok(Self::postgres(pool))
    }

    /// Fresh, empty in-process stores.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            invites: Arc::new(MemoryInviteStore::new()),
            settings: Arc::new(MemorySettingStore::new()),
            jobs: Arc::new(MemoryJobStore::new()),
            pool: None,
        }
    }

    /// Repositories over an established pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            invites: Arc::new(InviteRepository::new(pg.clone())),
            settings: Arc::new(SettingRepository::new(pg.clone())),
            jobs: Arc::new(JobRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// The PostgreSQL pool, when that backend is in use.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Backend liveness. In-process stores are always up.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &if self.pool.is_some() { "postgres" } else { "memory" })
            .finish()
    }
}
