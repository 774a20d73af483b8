//! Shared parsing utilities for visit and facility tables.
//!
//! Field values arrive as free-form strings from CSV exports; these helpers
//! turn them into typed values and return `None` for anything unusable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Datetime layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a timestamp in any of the accepted export formats.
///
/// RFC 3339 values keep their offset and are converted to UTC. Values
/// without an offset are taken to already be UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Parses a WGS84 lat/lon pair from optional string fields. Returns `None`
/// if either value is missing, unparseable, non-finite or out of range.
///
/// Zero is a real coordinate here (the equator and the prime meridian).
#[must_use]
pub fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> Option<(f64, f64)> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lon?.trim().parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some((latitude, longitude))
}

/// Parses a birth year, accepting integral floats like `1985.0` that
/// spreadsheet exports produce.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < 10_000.0).then(|| value as i32)
}

/// Trims a string field and drops it if nothing is left.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
