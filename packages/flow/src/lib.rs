#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Directed transfer flows between facilities.
//!
//! [`aggregate`] turns journey paths into weighted origin/destination edges.
//! [`ranking`] and [`regional`] are pure views over the resulting edge set:
//! top individuals and facilities, and flows crossing a region boundary.

pub mod aggregate;
pub mod ranking;
pub mod regional;

pub use aggregate::{EdgeCounts, aggregate_flows, count_transitions, scale_count};
pub use ranking::{facility_aggregates, rank_facilities, rank_individuals};
pub use regional::regional_flows;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone as _, Utc};
    use journey_map_geography_models::{Coordinate, Facility, FacilityDirectory};
    use journey_map_journey_models::{Demographics, JourneyPath, Waypoint};

    pub fn facility(code: &str, lat: f64, lon: f64) -> Facility {
        Facility {
            code: code.to_string(),
            name: format!("{code} Facility"),
            coordinate: Coordinate::new(lat, lon),
            city: "City".to_string(),
            region: "ST".to_string(),
        }
    }

    /// F1 (40,-75), F2 (41,-74), F3 (40.1,-75.1), F4 (34,-118).
    pub fn directory() -> FacilityDirectory {
        [
            facility("F1", 40.0, -75.0),
            facility("F2", 41.0, -74.0),
            facility("F3", 40.1, -75.1),
            facility("F4", 34.0, -118.0),
        ]
        .into_iter()
        .collect()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    /// Builds a path visiting `codes` on consecutive days.
    pub fn path(id: &str, codes: &[&str]) -> JourneyPath {
        let directory = directory();
        let waypoints = codes
            .iter()
            .zip(1..)
            .map(|(code, d)| Waypoint::at(directory.get(code).unwrap(), Some(day(d))))
            .collect();
        JourneyPath::new(id.to_string(), waypoints, Demographics::default())
    }
}
