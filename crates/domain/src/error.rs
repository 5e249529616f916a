//! Domain error taxonomy.

use thiserror::Error;

/// Errors produced by the core group and broadcast services.
///
/// Dependency failures from the store or push collaborator are logged with
/// context at the point they occur and surfaced here as a generic
/// [`DomainError::Dependency`], never with collaborator internals attached.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Group not found")]
    GroupNotFound,

    #[error("Group code already taken")]
    DuplicateCode,

    #[error("Group is at capacity")]
    CapacityExceeded,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    #[error("Dependency failure: {0}")]
    Dependency(String),
}
