//! Account secret hashing using Argon2id.
//!
//! Device accounts carry a derived secret rather than a user-chosen
//! password, but it is stored and verified exactly like one: hashed with
//! Argon2id, which is recommended by OWASP for credential storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Error type for secret hashing operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to hash secret: {0}")]
    HashError(String),

    #[error("Failed to verify secret: {0}")]
    VerifyError(String),

    #[error("Invalid secret hash format")]
    InvalidHashFormat,
}

/// Argon2id parameters following OWASP recommendations (2024).
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
const MEMORY_COST: u32 = 19456; // 19 MiB in KiB
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32; // 256-bit hash output

fn create_argon2() -> Result<Argon2<'static>, SecretError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| SecretError::HashError(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes an account secret using Argon2id.
///
/// Returns a PHC-formatted string that includes the algorithm, parameters,
/// salt, and hash, so the scheme can be upgraded without a data migration.
pub fn hash_secret(secret: &str) -> Result<String, SecretError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = create_argon2()?;

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SecretError::HashError(e.to_string()))
}

/// Verifies an account secret against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` when the secret matches, `Ok(false)` when it does not,
/// and an error only when the stored hash cannot be parsed.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, SecretError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| SecretError::InvalidHashFormat)?;
    let argon2 = create_argon2()?;

    match argon2.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SecretError::VerifyError(e.to_string())),
    }
}
