//! Outbound service clients.

pub mod push;

pub use push::{HttpPushService, LogOnlyPushService};
