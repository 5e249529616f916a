//! Device account model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An account keyed by a caller-supplied device identifier.
///
/// The secret is derived deterministically from the device identifier and
/// stored only as an Argon2id hash; its sole purpose is to make
/// register-or-login idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAccount {
    pub id: Uuid,
    pub device_id: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
}
