#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distances and fixed-radius region clustering.
//!
//! Distances use the haversine formula on a sphere with a fixed Earth radius
//! of 6371 km. A [`RegionCluster`] groups every directory facility within a
//! radius of a named reference point so flows can be rolled up across the
//! cluster boundary.

pub mod region;

pub use journey_map_geography_models::{Distance, MILES_PER_KM, km_to_miles};
use journey_map_geography_models::Coordinate;

pub use region::{RegionCluster, RegionMember, RegionSpec};

/// Mean Earth radius used for all distance calculations, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers and miles.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> Distance {
    Distance::from_km(haversine_km(a, b))
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Symmetric in its arguments and exactly `0.0` for identical coordinates.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Rounds a value to one decimal place for display-oriented statistics.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_KM: f64 = 1e-9;

    #[test]
    fn distance_to_self_is_zero() {
        let chicago = Coordinate::new(41.8781, -87.6298);
        assert!(haversine_km(chicago, chicago).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            Coordinate::new(40.0, -75.0),
            Coordinate::new(41.0, -74.0),
            Coordinate::new(41.8781, -87.6298),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(0.0, 180.0),
        ];
        for a in points {
            for b in points {
                let ab = haversine_km(a, b);
                let ba = haversine_km(b, a);
                assert!(
                    (ab - ba).abs() < TOLERANCE_KM,
                    "distance({a:?}, {b:?}) = {ab} but reverse = {ba}"
                );
            }
        }
    }

    #[test]
    fn one_degree_of_latitude() {
        let km = haversine_km(Coordinate::new(40.0, -75.0), Coordinate::new(41.0, -75.0));
        // 2 * pi * 6371 / 360
        assert!((km - 111.194_926_6).abs() < 1e-4, "got {km}");
    }

    #[test]
    fn known_city_pair() {
        // New York to Los Angeles, roughly 3936 km on a 6371 km sphere.
        let km = haversine_km(
            Coordinate::new(40.7128, -74.0060),
            Coordinate::new(34.0522, -118.2437),
        );
        assert!((km - 3935.7).abs() < 1.0, "got {km}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let km = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(km.is_finite());
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn distance_reports_miles() {
        let d = distance(Coordinate::new(40.0, -75.0), Coordinate::new(41.0, -75.0));
        assert!((d.distance_miles - d.distance_km * MILES_PER_KM).abs() < 1e-12);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert!((round1(123.456) - 123.5).abs() < f64::EPSILON);
        assert!((round1(0.04) - 0.0).abs() < f64::EPSILON);
    }
}
