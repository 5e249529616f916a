//! Store capability traits.
//!
//! All durable state lives behind these traits; the services in this crate
//! never talk to a database directly. Postgres-backed implementations live
//! in the `persistence` crate, and [`memory`] holds in-memory
//! implementations for tests and local development.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DeviceAccount, Group, LegacyGroup};

pub mod memory;

/// Errors surfaced by store adapters.
///
/// A "table/object class does not exist" condition is not an error at this
/// boundary: adapters map it to an absent record, matching how the managed
/// backend behaves before a class has ever been created.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for [`Group`] records, keyed by code.
///
/// `save` is an unconditional last-writer-wins overwrite; membership and
/// cooldown updates are therefore read-modify-write sequences that are
/// best-effort under concurrent contention on one code. An implementation
/// wanting strict guarantees can harden `save` into a conditional update
/// (compare-and-swap on `member_count`/`last_alarm_at`) without any caller
/// changes.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Finds a current-schema group by code.
    async fn find(&self, code: &str) -> Result<Option<Group>, StoreError>;

    /// Creates a new group record; fails with [`StoreError::Conflict`] if
    /// the code is already present.
    async fn create(&self, group: &Group) -> Result<(), StoreError>;

    /// Overwrites the stored record for `group.code`.
    async fn save(&self, group: &Group) -> Result<(), StoreError>;

    /// Deletes the record for `code`; absent records are not an error.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// Finds a group still living under the legacy schema.
    async fn find_legacy(&self, code: &str) -> Result<Option<LegacyGroup>, StoreError>;

    /// Deletes a legacy-schema record; absent records are not an error.
    async fn delete_legacy(&self, code: &str) -> Result<(), StoreError>;
}

/// Durable storage for device accounts, keyed by device identifier.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates a new account; fails with [`StoreError::Conflict`] if an
    /// account for the device identifier already exists.
    async fn create(&self, device_id: &str, secret_hash: &str)
        -> Result<DeviceAccount, StoreError>;

    /// Finds an account by device identifier.
    async fn find_by_device(&self, device_id: &str) -> Result<Option<DeviceAccount>, StoreError>;
}
