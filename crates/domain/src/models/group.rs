//! Group model: a 6-character code shared by a set of member accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default capacity limit for a group.
pub const DEFAULT_MAX_MEMBERS: usize = 20;

/// A group of devices coordinating alarms under one code.
///
/// The code is the only lookup key; there is no surrogate ID. `members` is
/// stored as a sequence but carries set semantics: no duplicates, order
/// irrelevant. `member_count` is a cache that must equal `members.len()`
/// after every mutation, which the mutating methods below maintain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub code: String,
    pub members: Vec<String>,
    pub member_count: i32,
    /// Timestamp of the most recently accepted broadcast; the Unix epoch
    /// means the group has never broadcast.
    pub last_alarm_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group with the creator as its only member.
    pub fn new(code: impl Into<String>, creator_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            members: vec![creator_id.into()],
            member_count: 1,
            last_alarm_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Whether the given account is a member of this group.
    pub fn is_member(&self, account_id: &str) -> bool {
        self.members.iter().any(|m| m == account_id)
    }

    /// Adds a member, keeping the count cache in sync. No-op for an
    /// existing member.
    pub fn add_member(&mut self, account_id: impl Into<String>) {
        let account_id = account_id.into();
        if !self.is_member(&account_id) {
            self.members.push(account_id);
        }
        self.member_count = self.members.len() as i32;
    }

    /// Removes a member, keeping the count cache in sync. No-op for an
    /// absent member.
    pub fn remove_member(&mut self, account_id: &str) {
        self.members.retain(|m| m != account_id);
        self.member_count = self.members.len() as i32;
    }

    /// Whether this group has never had an accepted broadcast.
    pub fn has_never_alarmed(&self) -> bool {
        self.last_alarm_at == DateTime::<Utc>::UNIX_EPOCH
    }
}

/// A group record in the historical schema (old table, old field names).
///
/// Only the legacy migrator in the group directory ever sees this shape;
/// every other code path works with [`Group`].
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyGroup {
    pub code: String,
    pub members: Vec<String>,
    /// Absent in the oldest records; reconstructed from `members` on
    /// migration.
    pub member_count: Option<i32>,
    /// Absent in records that never broadcast under the old schema.
    pub last_alarm_at: Option<DateTime<Utc>>,
}

impl LegacyGroup {
    /// Upgrades this record to the current schema.
    pub fn into_current(self) -> Group {
        let member_count = self
            .member_count
            .unwrap_or(self.members.len() as i32);
        Group {
            code: self.code,
            members: self.members,
            member_count,
            last_alarm_at: self.last_alarm_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}
