//! Route handlers.

pub mod alarms;
pub mod auth;
pub mod groups;
pub mod health;
