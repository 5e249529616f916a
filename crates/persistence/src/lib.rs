//! Persistence layer for the ClassBell backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Postgres-backed implementations of the domain store traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
