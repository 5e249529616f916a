//! Group entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{Group, LegacyGroup};
use sqlx::FromRow;

/// Database row mapping for the `alarm_groups` table (current schema).
#[derive(Debug, Clone, FromRow)]
pub struct GroupRow {
    pub code: String,
    pub members: Vec<String>,
    pub member_count: i32,
    pub last_alarm_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            code: row.code,
            members: row.members,
            member_count: row.member_count,
            last_alarm_at: row.last_alarm_at,
        }
    }
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        Self {
            code: group.code.clone(),
            members: group.members.clone(),
            member_count: group.member_count,
            last_alarm_at: group.last_alarm_at,
        }
    }
}

/// Database row mapping for the legacy `classes` table.
///
/// Older rows may lack the cached count and the alarm timestamp.
#[derive(Debug, Clone, FromRow)]
pub struct LegacyClassRow {
    pub class_code: String,
    pub members: Vec<String>,
    pub member_count: Option<i32>,
    pub last_alarm_at: Option<DateTime<Utc>>,
}

impl From<LegacyClassRow> for LegacyGroup {
    fn from(row: LegacyClassRow) -> Self {
        Self {
            code: row.class_code,
            members: row.members,
            member_count: row.member_count,
            last_alarm_at: row.last_alarm_at,
        }
    }
}
