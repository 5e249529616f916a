//! Cooldown gate: the per-group rate limit on broadcasts.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::models::Group;

/// Default cooldown window in seconds.
pub const DEFAULT_COOLDOWN_SECS: i64 = 60;

/// Enforces one accepted broadcast per group per window.
#[derive(Debug, Clone, Copy)]
pub struct CooldownGate {
    window_secs: i64,
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl CooldownGate {
    pub fn new(window_secs: i64) -> Self {
        Self { window_secs }
    }

    /// Seconds of cooldown remaining for `group` at `now`.
    ///
    /// A group that has never broadcast has zero remaining cooldown. The
    /// result is clamped to the window: a stamp ahead of `now` (clock skew
    /// between instances, or a skewed legacy record) reads as a full
    /// window, never more.
    pub fn remaining(&self, group: &Group, now: DateTime<Utc>) -> i64 {
        if group.has_never_alarmed() {
            return 0;
        }
        let elapsed = (now - group.last_alarm_at).num_seconds();
        (self.window_secs - elapsed).clamp(0, self.window_secs)
    }

    /// Accepts a broadcast, stamping `last_alarm_at = now`, or fails
    /// `RateLimited` with the remaining seconds attached.
    ///
    /// The caller must persist the stamped group before attempting
    /// delivery; the stamp is never rolled back, so a slow or failing
    /// delivery cannot re-open the window.
    pub fn try_accept(&self, group: &mut Group, now: DateTime<Utc>) -> Result<(), DomainError> {
        let remaining = self.remaining(group, now);
        if remaining > 0 {
            return Err(DomainError::RateLimited {
                retry_after_secs: remaining,
            });
        }
        // last_alarm_at only ever moves forward.
        if now > group.last_alarm_at {
            group.last_alarm_at = now;
        }
        Ok(())
    }
}
