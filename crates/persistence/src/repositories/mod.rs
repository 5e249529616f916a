//! Postgres-backed store implementations.

pub mod account;
pub mod group;

pub use account::PgAccountStore;
pub use group::PgGroupStore;

/// Postgres error code for "relation does not exist".
pub(crate) const UNDEFINED_TABLE: &str = "42P01";

/// Postgres error code for unique constraint violations.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// Whether a database error code means the queried relation is missing.
///
/// The managed platform the original system ran on creates object classes
/// lazily, so a missing table reads as "no record", not as a failure.
pub(crate) fn is_missing_relation(code: Option<&str>) -> bool {
    code == Some(UNDEFINED_TABLE)
}

/// Whether a database error code is a duplicate-key condition.
pub(crate) fn is_duplicate_key(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

/// Whether an sqlx error is an "undefined table" condition.
pub(crate) fn is_undefined_table(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if is_missing_relation(db_err.code().as_deref())
    )
}

/// Whether an sqlx error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if is_duplicate_key(db_err.code().as_deref())
    )
}
