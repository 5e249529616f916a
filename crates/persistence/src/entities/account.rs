//! Device account entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::DeviceAccount;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the `device_accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceAccountRow {
    pub id: Uuid,
    pub device_id: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceAccountRow> for DeviceAccount {
    fn from(row: DeviceAccountRow) -> Self {
        Self {
            id: row.id,
            device_id: row.device_id,
            secret_hash: row.secret_hash,
            created_at: row.created_at,
        }
    }
}
