//! Timestamp and date utilities
//!
//! All persisted datetimes are UTC, RFC 3339 with a `Z` suffix and
//! whole-second precision so SQLite's date functions can consume them
//! directly. Bare dates persist as `YYYY-MM-DD`.

use chrono::{DateTime, Datelike, Days, NaiveDate, SecondsFormat, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a datetime for storage (`2026-08-03T14:07:00Z`)
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored datetime back into UTC
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse datetime '{}': {}", s, e)))
}

/// Parse a stored date (`YYYY-MM-DD`)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("Invalid date '{}': {}", s, e)))
}

/// Monday of the week containing `date`.
///
/// Week boundaries are Monday-aligned: a Sunday maps to the Monday six
/// days earlier, never forward.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date - Days::new(back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_has_z_suffix_and_no_fraction() {
        let dt = DateTime::parse_from_rfc3339("2026-08-03T14:07:00.123456789+00:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(&dt), "2026-08-03T14:07:00Z");
    }

    #[test]
    fn test_datetime_roundtrip() {
        let dt = now();
        let parsed = parse_datetime(&format_datetime(&dt)).unwrap();
        // Sub-second precision is intentionally dropped
        assert_eq!(parsed.timestamp(), dt.timestamp());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("not a timestamp").is_err());
    }

    #[test]
    fn test_week_monday_midweek() {
        // 2026-08-05 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(week_monday(wed), NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
    }

    #[test]
    fn test_week_monday_on_monday_is_identity() {
        let mon = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(week_monday(mon), mon);
    }

    #[test]
    fn test_week_monday_on_sunday_goes_backward() {
        // A Sunday belongs to the week that started six days earlier
        let sun = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert_eq!(week_monday(sun), NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
    }
}
