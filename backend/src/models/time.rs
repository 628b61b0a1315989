//! Timestamp parsing and calendar formatting for climb records.
//!
//! Legacy rows carry free-text timestamps written by whatever client logged
//! them, so parsing is lenient: anything unrecognised becomes `None`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp string into UTC.
///
/// Accepts RFC 3339, a handful of naive `YYYY-MM-DD[ T]HH:MM[:SS[.f]]`
/// layouts (interpreted as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|naive| naive.and_utc())
}

/// Parse a calendar date (`YYYY-MM-DD`), also accepting a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    // Fall back to the date component of a full timestamp, without recursing
    // into the bare-date path again.
    if raw.len() > 10 {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.date());
            }
        }
    }
    None
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar month bucket (`YYYY-MM`) for a date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
