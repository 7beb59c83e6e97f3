//! Timetable records owned by directory entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Process-local identifier of a stored schedule record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        RecordId(v)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Descriptive fields of a class session.
///
/// These are passed through from the importer unchanged; the coordinator
/// never inspects them. Fields the remote source adds later land in `extra`
/// rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDetails {
    /// Subject taught in this session.
    #[serde(default)]
    pub subject: String,
    /// Kind of session (lecture, practice, lab).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Room the session takes place in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auditorium: Option<String>,
    /// Teacher holding the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    /// Groups attending the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    /// Any remaining descriptive fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A timetable entry as returned by the importer, before it is assigned an
/// owner and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Calendar date of the class session.
    pub date: NaiveDate,
    /// Label of the time slot ("pair") within that date.
    pub pair_name: String,
    #[serde(flatten)]
    pub details: RecordDetails,
}

/// A persisted timetable entry, owned by exactly one directory entity.
///
/// Records are created only by a refresh cycle and destroyed only as the
/// first step of the next refresh cycle for the same owner; between refreshes
/// they are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: RecordId,
    pub owner_id: EntityId,
    pub date: NaiveDate,
    pub pair_name: String,
    pub details: RecordDetails,
}

impl ScheduleRecord {
    /// Display ordering key: date ascending, then pair name, with the record
    /// id (insertion order) as the stable tie-breaker.
    pub fn display_key(&self) -> (NaiveDate, &str, RecordId) {
        (self.date, self.pair_name.as_str(), self.id)
    }
}
