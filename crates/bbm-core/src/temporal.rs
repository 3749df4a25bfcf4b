//! # Temporal Types — Local Measurement Timestamps
//!
//! Defines `MeasuredAt`, the timestamp of a single speed test.
//!
//! The measurement export stores date and time in two separate columns
//! (`Messzeitpunkt` as `DD.MM.YYYY`, `Uhrzeit` as `HH:MM:SS`) without any
//! timezone offset. The values are the wall clock of the measuring machine,
//! so `MeasuredAt` wraps a `NaiveDateTime` and never converts to UTC.
//! Calendar-day grouping therefore matches the day the user saw on screen.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Date format of the `Messzeitpunkt` column.
pub const EXPORT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Time format of the `Uhrzeit` column.
pub const EXPORT_TIME_FORMAT: &str = "%H:%M:%S";

/// Local wall-clock timestamp of a measurement, seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeasuredAt(NaiveDateTime);

impl MeasuredAt {
    /// Wrap a `NaiveDateTime`.
    pub fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Build from a calendar date and a time of day.
    pub fn from_date_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self(date.and_time(time))
    }

    /// Parse the export's separate date and time columns.
    ///
    /// Surrounding whitespace and stray double quotes are tolerated because
    /// some exports quote every field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] if either part does not match
    /// `DD.MM.YYYY` / `HH:MM:SS` or names an impossible calendar date.
    pub fn parse_export(date: &str, time: &str) -> Result<Self, CoreError> {
        let date = date.trim().trim_matches('"');
        let time = time.trim().trim_matches('"');
        let d = NaiveDate::parse_from_str(date, EXPORT_DATE_FORMAT).map_err(|_| {
            CoreError::InvalidTimestamp {
                input: date.to_string(),
                expected: "DD.MM.YYYY",
            }
        })?;
        let t = NaiveTime::parse_from_str(time, EXPORT_TIME_FORMAT).map_err(|_| {
            CoreError::InvalidTimestamp {
                input: time.to_string(),
                expected: "HH:MM:SS",
            }
        })?;
        Ok(Self::from_date_time(d, t))
    }

    /// Parse an ISO 8601 local timestamp (`YYYY-MM-DDTHH:MM:SS`).
    pub fn parse_iso(s: &str) -> Result<Self, CoreError> {
        NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S")
            .map(Self)
            .map_err(|_| CoreError::InvalidTimestamp {
                input: s.to_string(),
                expected: "YYYY-MM-DDTHH:MM:SS",
            })
    }

    /// Access the inner `NaiveDateTime`.
    pub fn as_datetime(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Calendar day of the measurement.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Signed duration from `earlier` to `self`.
    pub fn since(&self, earlier: &MeasuredAt) -> Duration {
        self.0 - earlier.0
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// Render in the export's own `DD.MM.YYYY HH:MM:SS` layout.
    pub fn to_export_string(&self) -> String {
        self.0.format("%d.%m.%Y %H:%M:%S").to_string()
    }
}

impl std::fmt::Display for MeasuredAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_export_accepts_german_layout() {
        let ts = MeasuredAt::parse_export("08.01.2024", "19:27:41").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-08T19:27:41");
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn parse_export_strips_quotes_and_whitespace() {
        let ts = MeasuredAt::parse_export("\"08.01.2024\"", " \"19:27:41\" ").unwrap();
        assert_eq!(ts.to_export_string(), "08.01.2024 19:27:41");
    }

    #[test]
    fn parse_export_rejects_impossible_date() {
        let err = MeasuredAt::parse_export("31.02.2024", "10:00:00").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp { expected: "DD.MM.YYYY", .. }));
    }

    #[test]
    fn parse_export_rejects_bad_time() {
        assert!(MeasuredAt::parse_export("01.02.2024", "25:00:00").is_err());
        assert!(MeasuredAt::parse_export("01.02.2024", "").is_err());
    }

    #[test]
    fn parse_export_rejects_iso_date() {
        assert!(MeasuredAt::parse_export("2024-01-08", "10:00:00").is_err());
    }

    #[test]
    fn parse_iso_roundtrip() {
        let ts = MeasuredAt::parse_iso("2024-03-01T06:05:04").unwrap();
        assert_eq!(MeasuredAt::parse_iso(&ts.to_iso8601()).unwrap(), ts);
    }

    #[test]
    fn since_is_signed() {
        let a = MeasuredAt::parse_export("01.02.2024", "10:00:00").unwrap();
        let b = MeasuredAt::parse_export("01.02.2024", "10:05:00").unwrap();
        assert_eq!(b.since(&a).num_minutes(), 5);
        assert_eq!(a.since(&b).num_minutes(), -5);
    }

    #[test]
    fn ordering_follows_wall_clock() {
        let a = MeasuredAt::parse_export("31.12.2023", "23:59:59").unwrap();
        let b = MeasuredAt::parse_export("01.01.2024", "00:00:00").unwrap();
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = MeasuredAt::parse_export("08.01.2024", "19:27:41").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: MeasuredAt = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
