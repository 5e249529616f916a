//! Domain models for ClassBell.

pub mod account;
pub mod alarm;
pub mod group;

pub use account::DeviceAccount;
pub use alarm::{AlarmKind, AlarmPayload};
pub use group::{Group, LegacyGroup};
