//! In-memory settings store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use inbound_core::result::AppResult;
use inbound_entity::setting::Setting;

use crate::store::SettingStore;

/// Settings store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySettingStore {
    settings: Mutex<HashMap<String, Setting>>,
}

impl MemorySettingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingStore for MemorySettingStore {
    async fn get(&self, key: &str) -> AppResult<Option<Setting>> {
        Ok(self.settings.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<Setting> {
        let setting = Setting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        };
        self.settings
            .lock()
            .await
            .insert(key.to_string(), setting.clone());
        Ok(setting)
    }
}
