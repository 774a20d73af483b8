#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Facility directory and coordinate types.
//!
//! The facility directory is static reference data: every facility code maps
//! to a WGS84 coordinate plus descriptive metadata. It is loaded once and
//! shared read-only by every stage of the journey pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns the coordinate as a `[lon, lat]` pair, the order map
    /// renderers expect for camera centers.
    #[must_use]
    pub const fn lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Conversion factor from kilometers to statute miles.
pub const MILES_PER_KM: f64 = 0.621_371;

/// Converts kilometers to statute miles.
#[must_use]
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// A great-circle distance expressed in both kilometers and miles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Distance {
    /// Distance in kilometers.
    pub distance_km: f64,
    /// Distance in statute miles.
    pub distance_miles: f64,
}

impl Distance {
    /// Builds a distance from a kilometer value.
    #[must_use]
    pub fn from_km(km: f64) -> Self {
        Self {
            distance_km: km,
            distance_miles: km_to_miles(km),
        }
    }
}

impl std::ops::Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_km(self.distance_km + rhs.distance_km)
    }
}

impl std::iter::Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::from_km(iter.map(|d| d.distance_km).sum())
    }
}

/// A facility row from the facility directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Unique facility code (join key for visit records).
    pub code: String,
    /// Human-readable facility name.
    pub name: String,
    /// Geocoded location.
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// City the facility is located in.
    pub city: String,
    /// State, province or other administrative region.
    pub region: String,
}

/// Static lookup from facility code to [`Facility`].
///
/// Codes are matched by exact equality. Iteration order is ascending by code.
#[derive(Debug, Clone, Default)]
pub struct FacilityDirectory {
    facilities: BTreeMap<String, Facility>,
}

impl FacilityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            facilities: BTreeMap::new(),
        }
    }

    /// Adds a facility. The first row seen for a code wins; returns `false`
    /// if the code was already present and the new row was ignored.
    pub fn insert(&mut self, facility: Facility) -> bool {
        if self.facilities.contains_key(&facility.code) {
            return false;
        }
        self.facilities.insert(facility.code.clone(), facility);
        true
    }

    /// Looks up a facility by exact code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Facility> {
        self.facilities.get(code)
    }

    /// Returns `true` if the directory knows this code.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.facilities.contains_key(code)
    }

    /// Number of facilities in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Returns `true` if the directory has no facilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Iterates facilities in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.values()
    }
}

impl FromIterator<Facility> for FacilityDirectory {
    fn from_iter<T: IntoIterator<Item = Facility>>(iter: T) -> Self {
        let mut directory = Self::new();
        for facility in iter {
            directory.insert(facility);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(code: &str, name: &str) -> Facility {
        Facility {
            code: code.to_string(),
            name: name.to_string(),
            coordinate: Coordinate::new(40.0, -75.0),
            city: "Philadelphia".to_string(),
            region: "PA".to_string(),
        }
    }

    #[test]
    fn first_row_for_a_code_wins() {
        let mut directory = FacilityDirectory::new();
        assert!(directory.insert(facility("F1", "First")));
        assert!(!directory.insert(facility("F1", "Second")));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get("F1").unwrap().name, "First");
    }

    #[test]
    fn lookup_is_exact() {
        let directory: FacilityDirectory = [facility("F1", "First")].into_iter().collect();
        assert!(directory.contains("F1"));
        assert!(!directory.contains("f1"));
        assert!(!directory.contains("F1 "));
    }

    #[test]
    fn iterates_in_code_order() {
        let directory: FacilityDirectory = [facility("B", "b"), facility("A", "a")]
            .into_iter()
            .collect();
        let codes: Vec<&str> = directory.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }

    #[test]
    fn miles_are_derived_from_km() {
        let d = Distance::from_km(100.0);
        assert!((d.distance_miles - 62.1371).abs() < 1e-9);
    }

    #[test]
    fn distances_sum_in_km() {
        let total: Distance = [Distance::from_km(1.5), Distance::from_km(2.5)]
            .into_iter()
            .sum();
        assert!((total.distance_km - 4.0).abs() < f64::EPSILON);
        assert!((total.distance_miles - 4.0 * MILES_PER_KM).abs() < 1e-12);
    }

    #[test]
    fn serializes_flat_lat_lon() {
        let json = serde_json::to_value(facility("F1", "First")).unwrap();
        assert_eq!(json["lat"], 40.0);
        assert_eq!(json["lon"], -75.0);
        assert!(json.get("coordinate").is_none());
    }
}
