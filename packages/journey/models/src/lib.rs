#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Visit record, waypoint and journey path types.
//!
//! A [`VisitRecord`] is one raw row from the visit table. The path builder
//! joins records against the facility directory and groups them into one
//! [`JourneyPath`] per individual: an ordered list of [`Waypoint`]s.

pub mod timestamp;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use journey_map_geography_models::{Coordinate, Facility};
use serde::{Deserialize, Serialize};

/// Demographic attributes carried alongside a visit record.
///
/// Passed through untouched; the path builder keeps the first-seen values
/// for each individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    /// Reported gender.
    pub gender: Option<String>,
    /// Year of birth.
    pub birth_year: Option<i32>,
    /// Country of citizenship.
    pub citizenship: Option<String>,
    /// Reported ethnicity.
    pub ethnicity: Option<String>,
}

/// One raw visit row. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    /// Identifier of the individual, if present.
    pub individual_id: Option<String>,
    /// Facility code, if present.
    pub facility_code: Option<String>,
    /// Check-in (book-in) time.
    pub check_in: Option<DateTime<Utc>>,
    /// Check-out (book-out) time.
    pub check_out: Option<DateTime<Utc>>,
    /// Demographic attributes.
    pub demographics: Demographics,
}

impl VisitRecord {
    /// Returns the trimmed individual id, or `None` if it is missing, empty
    /// or whitespace-only.
    #[must_use]
    pub fn valid_individual_id(&self) -> Option<&str> {
        self.individual_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Returns the facility code, or `None` if it is missing or blank.
    #[must_use]
    pub fn valid_facility_code(&self) -> Option<&str> {
        self.facility_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

/// A single stop along an individual's path, joined with facility metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Facility code.
    pub facility_code: String,
    /// Facility name.
    pub facility_name: String,
    /// Facility latitude.
    pub lat: f64,
    /// Facility longitude.
    pub lon: f64,
    /// Facility city.
    pub city: String,
    /// Facility region.
    pub region: String,
    /// Check-in time, serialized as RFC 3339 UTC.
    #[serde(with = "timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Waypoint {
    /// Builds a waypoint from a facility and the visit's check-in time.
    #[must_use]
    pub fn at(facility: &Facility, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            facility_code: facility.code.clone(),
            facility_name: facility.name.clone(),
            lat: facility.coordinate.lat,
            lon: facility.coordinate.lon,
            city: facility.city.clone(),
            region: facility.region.clone(),
            timestamp,
        }
    }

    /// The waypoint's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// The chronologically ordered visits of one individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyPath {
    /// Individual identifier (trimmed, never empty).
    pub individual_id: String,
    /// Waypoints in non-decreasing timestamp order.
    pub waypoints: Vec<Waypoint>,
    /// Number of distinct facility codes across the waypoints.
    pub unique_facilities: usize,
    /// First-seen demographics for this individual.
    pub demographics: Demographics,
}

impl JourneyPath {
    /// Builds a path, computing its distinct-facility count.
    #[must_use]
    pub fn new(individual_id: String, waypoints: Vec<Waypoint>, demographics: Demographics) -> Self {
        let unique_facilities = waypoints
            .iter()
            .map(|w| w.facility_code.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            individual_id,
            waypoints,
            unique_facilities,
            demographics,
        }
    }

    /// Total number of waypoints.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether this path takes part in transfer analysis (two or more
    /// waypoints).
    #[must_use]
    pub fn has_transfers(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Consecutive waypoint pairs, including same-facility pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.waypoints.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Consecutive waypoint pairs between different facilities.
    pub fn transfers(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> {
        self.legs()
            .filter(|(from, to)| from.facility_code != to.facility_code)
    }

    /// First waypoint, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// Last waypoint, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }
}

/// Data-quality accounting for one path-building pass.
///
/// Every input record lands in exactly one bucket: accepted, or one of the
/// exclusion counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBuildReport {
    /// Records seen.
    pub total_records: u64,
    /// Records with a null, empty or whitespace-only individual id.
    pub missing_individual_id: u64,
    /// Records with no facility code.
    pub missing_facility_code: u64,
    /// Records with no check-in time.
    pub missing_check_in: u64,
    /// Records whose facility code is not in the facility directory.
    pub unknown_facility_records: u64,
    /// Distinct unknown facility codes, sorted.
    pub unknown_facility_codes: Vec<String>,
    /// Records that became waypoints.
    pub accepted_records: u64,
}

impl PathBuildReport {
    /// Total records excluded for any reason.
    #[must_use]
    pub const fn excluded_records(&self) -> u64 {
        self.missing_individual_id
            + self.missing_facility_code
            + self.missing_check_in
            + self.unknown_facility_records
    }
}

/// Counts of individuals by how much of the pipeline they participate in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneySummary {
    /// Individuals with at least one accepted visit.
    pub individuals: u64,
    /// Individuals with two or more accepted visits.
    pub individuals_with_multiple_visits: u64,
    /// Individuals seen at two or more distinct facilities.
    pub individuals_with_multiple_facilities: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn waypoint(code: &str) -> Waypoint {
        Waypoint {
            facility_code: code.to_string(),
            facility_name: format!("{code} Facility"),
            lat: 40.0,
            lon: -75.0,
            city: String::new(),
            region: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn blank_individual_ids_are_invalid() {
        let mut record = VisitRecord {
            individual_id: Some("   ".to_string()),
            facility_code: Some("F1".to_string()),
            check_in: None,
            check_out: None,
            demographics: Demographics::default(),
        };
        assert_eq!(record.valid_individual_id(), None);

        record.individual_id = None;
        assert_eq!(record.valid_individual_id(), None);

        record.individual_id = Some(" A1 ".to_string());
        assert_eq!(record.valid_individual_id(), Some("A1"));
    }

    #[test]
    fn counts_distinct_facilities() {
        let path = JourneyPath::new(
            "A".to_string(),
            vec![waypoint("F1"), waypoint("F2"), waypoint("F1")],
            Demographics::default(),
        );
        assert_eq!(path.unique_facilities, 2);
        assert_eq!(path.waypoint_count(), 3);
    }

    #[test]
    fn transfers_skip_same_facility_legs() {
        let path = JourneyPath::new(
            "A".to_string(),
            vec![waypoint("F1"), waypoint("F1"), waypoint("F2")],
            Demographics::default(),
        );
        assert_eq!(path.legs().count(), 2);
        let transfers: Vec<(&str, &str)> = path
            .transfers()
            .map(|(a, b)| (a.facility_code.as_str(), b.facility_code.as_str()))
            .collect();
        assert_eq!(transfers, vec![("F1", "F2")]);
    }

    #[test]
    fn single_waypoint_has_no_transfers() {
        let path = JourneyPath::new("A".to_string(), vec![waypoint("F1")], Demographics::default());
        assert!(!path.has_transfers());
        assert_eq!(path.transfers().count(), 0);
    }

    #[test]
    fn waypoint_timestamp_serializes_as_utc_rfc3339() {
        let mut w = waypoint("F1");
        w.timestamp = Some(Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap());
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["timestamp"], "2024-01-15T14:30:00Z");

        w.timestamp = None;
        let json = serde_json::to_value(&w).unwrap();
        assert!(json["timestamp"].is_null());
    }
}
