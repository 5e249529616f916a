//! Group directory: the single lookup entry point for group records.
//!
//! Resolves a code against the current-schema store and falls back to the
//! legacy schema, upgrading legacy records transparently on first access.

use std::sync::Arc;

use crate::error::DomainError;
use crate::models::Group;
use crate::services::storage_error;
use crate::store::{GroupStore, StoreError};

/// Resolves group codes, migrating legacy records on the way.
#[derive(Clone)]
pub struct GroupDirectory {
    store: Arc<dyn GroupStore>,
}

impl GroupDirectory {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }

    /// Resolves `code` to a current-schema group, or `None` if no record
    /// exists under either schema.
    ///
    /// A legacy-schema hit is upgraded and persisted before being returned;
    /// the legacy copy is then deleted best-effort. Once the migrated
    /// record is durable it is authoritative, so a failed legacy delete is
    /// logged and swallowed rather than surfaced.
    pub async fn resolve(&self, code: &str) -> Result<Option<Group>, DomainError> {
        if let Some(group) = self
            .store
            .find(code)
            .await
            .map_err(|e| storage_error("find", code, e))?
        {
            return Ok(Some(group));
        }

        let Some(legacy) = self
            .store
            .find_legacy(code)
            .await
            .map_err(|e| storage_error("find_legacy", code, e))?
        else {
            return Ok(None);
        };

        let group = legacy.into_current();
        match self.store.create(&group).await {
            Ok(()) => {
                tracing::info!(code = code, member_count = group.member_count, "Migrated legacy group record");
            }
            Err(StoreError::Conflict) => {
                // A concurrent first access migrated this code before us;
                // that record is the durable one.
                let existing = self
                    .store
                    .find(code)
                    .await
                    .map_err(|e| storage_error("find", code, e))?;
                self.cleanup_legacy(code).await;
                return Ok(existing.or(Some(group)));
            }
            Err(e) => return Err(storage_error("create", code, e)),
        }

        self.cleanup_legacy(code).await;
        Ok(Some(group))
    }

    async fn cleanup_legacy(&self, code: &str) {
        if let Err(e) = self.store.delete_legacy(code).await {
            tracing::warn!(
                code = code,
                error = %e,
                "Failed to delete legacy group record after migration"
            );
        }
    }
}
