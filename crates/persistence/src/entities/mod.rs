//! Entity definitions (database row mappings).

pub mod account;
pub mod group;

pub use account::DeviceAccountRow;
pub use group::{GroupRow, LegacyClassRow};
