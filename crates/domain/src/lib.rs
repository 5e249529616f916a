//! Domain layer for the ClassBell backend.
//!
//! This crate contains:
//! - Domain models (Group, DeviceAccount, alarm payloads)
//! - Store and push capability traits
//! - Business logic services (directory, membership, cooldown, broadcast,
//!   identity)
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::DomainError;
