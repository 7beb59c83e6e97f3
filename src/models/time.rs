//! Hour-granularity freshness marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of the marker token. Truncation to the hour is deliberate: two
/// markers are equal exactly when they fall in the same wall-clock hour,
/// which bounds remote imports to once per entity per hour.
const HOUR_FORMAT: &str = "%Y-%m-%dT%H";

/// Opaque hour-granularity token used as the staleness clock
/// (e.g. `2024-05-01T14`).
///
/// Markers are compared for equality only, never as elapsed durations — the
/// refresh-frequency contract is "at most one import per entity per
/// wall-clock hour", not "at most one import per sixty minutes".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourMarker(String);

impl HourMarker {
    /// Marker for the current UTC hour.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Marker for the hour containing `dt`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        HourMarker(dt.format(HOUR_FORMAT).to_string())
    }

    /// Wrap an already-formatted token. Used by storage backends and tests;
    /// the token is never reparsed, so no validation happens here.
    pub fn from_token(token: impl Into<String>) -> Self {
        HourMarker(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HourMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_marker_truncates_to_hour() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 14, 3, 10).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 1, 14, 59, 59).unwrap();
        assert_eq!(HourMarker::from_datetime(a), HourMarker::from_datetime(b));
        assert_eq!(HourMarker::from_datetime(a).as_str(), "2024-05-01T14");
    }

    #[test]
    fn test_marker_differs_across_hours() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 9, 59, 59).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_ne!(HourMarker::from_datetime(a), HourMarker::from_datetime(b));
    }

    #[test]
    fn test_from_token_matches_formatted() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(
            HourMarker::from_token("2024-01-01T10"),
            HourMarker::from_datetime(dt)
        );
    }
}
