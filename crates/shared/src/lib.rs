//! Shared utilities and common types for the ClassBell backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Deterministic device credential derivation (HMAC-SHA256)
//! - Account secret hashing with Argon2id
//! - Session token issuance and validation (JWT)
//! - Common validation logic (class codes, device identifiers)

pub mod crypto;
pub mod jwt;
pub mod secret;
pub mod validation;
