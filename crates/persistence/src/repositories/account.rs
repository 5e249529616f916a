//! Postgres-backed device account store.

use async_trait::async_trait;
use domain::models::DeviceAccount;
use domain::store::{AccountStore, StoreError};
use sqlx::PgPool;

use crate::entities::DeviceAccountRow;
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Account store backed by the `device_accounts` table.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Creates a new PgAccountStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn unavailable(err: sqlx::Error) -> StoreError {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(
        &self,
        device_id: &str,
        secret_hash: &str,
    ) -> Result<DeviceAccount, StoreError> {
        let timer = QueryTimer::new("create_device_account");
        let result = sqlx::query_as::<_, DeviceAccountRow>(
            r#"
            INSERT INTO device_accounts (device_id, secret_hash)
            VALUES ($1, $2)
            RETURNING id, device_id, secret_hash, created_at
            "#,
        )
        .bind(device_id)
        .bind(secret_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict),
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn find_by_device(&self, device_id: &str) -> Result<Option<DeviceAccount>, StoreError> {
        let timer = QueryTimer::new("find_device_account");
        let result = sqlx::query_as::<_, DeviceAccountRow>(
            r#"
            SELECT id, device_id, secret_hash, created_at
            FROM device_accounts
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(row) => Ok(row.map(DeviceAccount::from)),
            Err(e) => Err(Self::unavailable(e)),
        }
    }
}
