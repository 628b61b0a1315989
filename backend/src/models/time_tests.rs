use super::*;
use chrono::{TimeZone, Timelike};

#[test]
fn test_parse_rfc3339() {
    let dt = parse_timestamp("2024-05-03T18:30:00+02:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 3, 16, 30, 0).unwrap());
}

#[test]
fn test_parse_naive_space_separated() {
    let dt = parse_timestamp("2024-05-03 18:30:12").unwrap();
    assert_eq!(dt.hour(), 18);
    assert_eq!(dt.second(), 12);
}

#[test]
fn test_parse_naive_with_fraction() {
    let dt = parse_timestamp("2024-05-03T18:30:12.250").unwrap();
    assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
}

#[test]
fn test_parse_bare_date_is_midnight() {
    let dt = parse_timestamp("2024-05-03").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_garbage_is_none() {
    assert!(parse_timestamp("yesterday-ish").is_none());
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("   ").is_none());
    assert!(parse_timestamp("2024-13-45").is_none());
}

#[test]
fn test_parse_date_from_timestamp() {
    assert_eq!(
        parse_date("2024-05-03 09:00:00"),
        NaiveDate::from_ymd_opt(2024, 5, 3)
    );
    assert_eq!(parse_date("not a date"), None);
}

#[test]
fn test_format_date_and_month_key() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    assert_eq!(format_date(date), "2024-01-07");
    assert_eq!(month_key(date), "2024-01");
}
