//! Alarm kinds and the push payload they expand to.

use serde::{Deserialize, Serialize};

/// The kind of alarm being broadcast.
///
/// Parsed from a free-form caller-supplied tag; unrecognized or absent tags
/// map to [`AlarmKind::General`], so parsing is total and never an input
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmKind {
    Checkin,
    Rollcall,
    General,
}

impl AlarmKind {
    /// Maps a caller-supplied tag to an alarm kind.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("checkin") => AlarmKind::Checkin,
            Some("rollcall") => AlarmKind::Rollcall,
            _ => AlarmKind::General,
        }
    }

    /// The human-readable alert text for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            AlarmKind::Checkin => "A classmate just checked in - get here now!",
            AlarmKind::Rollcall => "Roll call has started - get here now!",
            AlarmKind::General => "Something is happening in class - come now!",
        }
    }
}

impl std::fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlarmKind::Checkin => write!(f, "checkin"),
            AlarmKind::Rollcall => write!(f, "rollcall"),
            AlarmKind::General => write!(f, "general"),
        }
    }
}

/// The payload handed to the push collaborator for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmPayload {
    pub alert: String,
    pub sound: String,
    pub badge: String,
}

impl AlarmPayload {
    /// Builds the payload for an alarm kind.
    ///
    /// Sound and badge values are fixed by the client app contract.
    pub fn for_kind(kind: AlarmKind) -> Self {
        Self {
            alert: kind.message().to_string(),
            sound: "alarm.caf".to_string(),
            badge: "Increment".to_string(),
        }
    }
}
