//! Business logic services.

pub mod broadcast;
pub mod cooldown;
pub mod directory;
pub mod identity;
pub mod membership;
pub mod push;

pub use broadcast::{compose_alert, AlarmOutcome, BroadcastService};
pub use cooldown::CooldownGate;
pub use directory::GroupDirectory;
pub use identity::IdentityService;
pub use membership::{GroupInfo, JoinOutcome, LeaveOutcome, MembershipService};
pub use push::{MockPushService, PushError, PushService};

use crate::error::DomainError;
use crate::store::StoreError;

/// Logs a store failure with operation context and collapses it to the
/// generic dependency error the caller is allowed to see.
pub(crate) fn storage_error(operation: &str, code: &str, err: StoreError) -> DomainError {
    tracing::error!(
        operation = operation,
        code = code,
        error = %err,
        "Group store operation failed"
    );
    DomainError::Dependency("storage unavailable".to_string())
}
