//! In-memory store implementations.
//!
//! Used by unit and integration tests, and by local development runs that
//! have no Postgres available. Not suitable for production: state is lost
//! on restart and shared only within one process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{DeviceAccount, Group, LegacyGroup};
use crate::store::{AccountStore, GroupStore, StoreError};

/// In-memory [`GroupStore`] holding current and legacy records side by side.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    legacy: Arc<RwLock<HashMap<String, LegacyGroup>>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a legacy-schema record, as left behind by the old app version.
    pub async fn seed_legacy(&self, record: LegacyGroup) {
        self.legacy.write().await.insert(record.code.clone(), record);
    }

    /// Whether a legacy record still exists for `code`.
    pub async fn has_legacy(&self, code: &str) -> bool {
        self.legacy.read().await.contains_key(code)
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn find(&self, code: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.read().await.get(code).cloned())
    }

    async fn create(&self, group: &Group) -> Result<(), StoreError> {
        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.code) {
            return Err(StoreError::Conflict);
        }
        groups.insert(group.code.clone(), group.clone());
        Ok(())
    }

    async fn save(&self, group: &Group) -> Result<(), StoreError> {
        self.groups
            .write()
            .await
            .insert(group.code.clone(), group.clone());
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.groups.write().await.remove(code);
        Ok(())
    }

    async fn find_legacy(&self, code: &str) -> Result<Option<LegacyGroup>, StoreError> {
        Ok(self.legacy.read().await.get(code).cloned())
    }

    async fn delete_legacy(&self, code: &str) -> Result<(), StoreError> {
        self.legacy.write().await.remove(code);
        Ok(())
    }
}

/// In-memory [`AccountStore`] keyed by device identifier.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, DeviceAccount>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(
        &self,
        device_id: &str,
        secret_hash: &str,
    ) -> Result<DeviceAccount, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(device_id) {
            return Err(StoreError::Conflict);
        }
        let account = DeviceAccount {
            id: Uuid::new_v4(),
            device_id: device_id.to_string(),
            secret_hash: secret_hash.to_string(),
            created_at: Utc::now(),
        };
        accounts.insert(device_id.to_string(), account.clone());
        Ok(account)
    }

    async fn find_by_device(&self, device_id: &str) -> Result<Option<DeviceAccount>, StoreError> {
        Ok(self.accounts.read().await.get(device_id).cloned())
    }
}
