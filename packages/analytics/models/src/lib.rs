#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Artifact types written by the generator.
//!
//! Each top-level type here is serialized to one JSON file consumed by the
//! map frontend: [`HighlightsArtifact`] to `highlights.json`,
//! [`StatisticsArtifact`] to `statistics.json` and [`TimelineArtifact`] to
//! `timeline.json`. `flows.json` is the [`FlowSet`] itself.

use std::collections::BTreeMap;

pub use journey_map_flow_models::FlowSet;
use journey_map_flow_models::{FacilityRef, NeighborFlow};
use journey_map_geography_models::Coordinate;
use journey_map_journey_models::{JourneySummary, PathBuildReport, Waypoint};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Narrative facts about one highlighted individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryData {
    /// Reported gender.
    pub gender: Option<String>,
    /// Year of birth.
    pub birth_year: Option<i32>,
    /// Country of citizenship.
    pub citizenship: Option<String>,
    /// Reported ethnicity.
    pub ethnicity: Option<String>,
    /// Name of the first facility visited.
    pub first_facility: Option<String>,
    /// Region of the first facility visited.
    pub first_region: Option<String>,
    /// Check-in time at the first facility.
    pub first_date: Option<String>,
    /// Name of the last facility visited.
    pub last_facility: Option<String>,
    /// Region of the last facility visited.
    pub last_region: Option<String>,
    /// Check-in time at the last facility.
    pub last_date: Option<String>,
    /// Distance along the whole path in kilometers.
    pub total_distance_km: f64,
    /// Distance along the whole path in miles.
    pub total_distance_miles: f64,
}

/// One highlighted individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Individual identifier.
    pub individual_id: String,
    /// Every waypoint in chronological order.
    pub path: Vec<Waypoint>,
    /// Number of waypoints on the path.
    pub transfer_count: usize,
    /// Number of distinct facilities on the path.
    pub unique_facilities: usize,
    /// Narrative facts.
    pub story_data: StoryData,
}

/// Contents of `highlights.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightsArtifact {
    /// Top-ranked individuals.
    pub highlights: Vec<Highlight>,
    /// Highest distinct-facility count among ranked individuals, or 0.
    pub max_transfers: usize,
}

/// Network-wide transfer statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Count-weighted mean transfer distance in kilometers, one decimal.
    pub avg_transfer_distance_km: f64,
    /// Count-weighted mean transfer distance in miles, one decimal.
    pub avg_transfer_distance_miles: f64,
    /// Total transitions across all edges.
    pub total_transfers: u64,
    /// Distinct origin/destination pairs.
    pub unique_routes: u64,
}

/// What a featured location describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LocationKind {
    /// A radius cluster of facilities.
    Region,
    /// A single facility.
    Facility,
}

/// Map camera hint for a featured location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Zoom level.
    pub zoom: f64,
    /// Pitch in degrees.
    pub pitch: f64,
    /// Bearing in degrees.
    pub bearing: f64,
}

impl Camera {
    /// A top-down, north-up camera centered on `center`.
    #[must_use]
    pub const fn overhead(center: Coordinate, zoom: f64) -> Self {
        Self {
            center: center.lon_lat(),
            zoom,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

/// A facility listed under a featured region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFacility {
    /// The member facility.
    #[serde(flatten)]
    pub facility: FacilityRef,
    /// Distance to the region's reference point in kilometers.
    pub distance_to_reference_km: f64,
}

/// A region or facility called out in the statistics panel.
///
/// Region entries carry `facilities`; facility entries carry `code`, `lat`,
/// `lon`, `city` and `region`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedLocation {
    /// Display name.
    pub name: String,
    /// Region or facility.
    #[serde(rename = "type")]
    pub kind: LocationKind,
    /// Facility code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Facility latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Facility longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Facility city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Facility region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Up to three member facilities closest to the region's reference point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facilities: Option<Vec<RegionFacility>>,
    /// `outflows + inflows`.
    pub total_transfers: u64,
    /// Transfers leaving the location.
    pub outflows: u64,
    /// Transfers arriving at the location.
    pub inflows: u64,
    /// Busiest destinations.
    pub top_destinations: Vec<NeighborFlow>,
    /// Busiest origins.
    pub top_origins: Vec<NeighborFlow>,
    /// Where the map should fly to.
    pub camera: Camera,
}

/// Contents of `statistics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsArtifact {
    /// Network-wide statistics.
    pub overall_stats: OverallStats,
    /// The featured region followed by the busiest facilities.
    pub featured_locations: Vec<FeaturedLocation>,
    /// How many individuals reach each stage of transfer analysis.
    pub journey_summary: JourneySummary,
    /// Record acceptance and exclusion counts.
    pub data_quality: PathBuildReport,
}

/// Visits in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Month as `YYYY-MM`.
    pub date: String,
    /// Check-ins during the month.
    pub visits: u64,
}

/// First and last month in a timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First month, `YYYY-MM`.
    pub start: Option<String>,
    /// Last month, `YYYY-MM`.
    pub end: Option<String>,
}

/// Contents of `timeline.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineArtifact {
    /// Monthly visit counts, ascending by month.
    pub data: Vec<TimelinePoint>,
    /// Span covered by `data`.
    pub date_range: DateRange,
    /// Sum of all monthly counts.
    pub total: u64,
    /// Monthly counts per citizenship country.
    pub by_citizenship: BTreeMap<String, Vec<TimelinePoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(kind: LocationKind) -> FeaturedLocation {
        FeaturedLocation {
            name: "Somewhere".to_string(),
            kind,
            code: None,
            lat: None,
            lon: None,
            city: None,
            region: None,
            facilities: None,
            total_transfers: 0,
            outflows: 0,
            inflows: 0,
            top_destinations: Vec::new(),
            top_origins: Vec::new(),
            camera: Camera::overhead(Coordinate::new(41.88, -87.63), 9.0),
        }
    }

    #[test]
    fn location_kind_round_trips_through_its_name() {
        for (kind, name) in [
            (LocationKind::Region, "region"),
            (LocationKind::Facility, "facility"),
        ] {
            assert_eq!(kind.to_string(), name);
            assert_eq!(kind.as_ref(), name);
            assert_eq!(name.parse::<LocationKind>().unwrap(), kind);
            assert_eq!(kind.to_string().parse::<LocationKind>().unwrap(), kind);

            let json = serde_json::to_value(location(kind)).unwrap();
            assert_eq!(json["type"], name);
        }
        assert!("Region".parse::<LocationKind>().is_err());
    }

    #[test]
    fn camera_center_is_lon_lat() {
        let json = serde_json::to_value(location(LocationKind::Region)).unwrap();
        assert_eq!(json["camera"]["center"][0], -87.63);
        assert_eq!(json["camera"]["center"][1], 41.88);
        assert_eq!(json["camera"]["pitch"], 0.0);
        assert_eq!(json["camera"]["bearing"], 0.0);
    }

    #[test]
    fn facility_only_fields_are_omitted_for_regions() {
        let json = serde_json::to_value(location(LocationKind::Region)).unwrap();
        assert!(json.get("code").is_none());
        assert!(json.get("facilities").is_none());

        let mut region = location(LocationKind::Region);
        region.facilities = Some(Vec::new());
        let json = serde_json::to_value(region).unwrap();
        assert_eq!(json["facilities"], serde_json::json!([]));
    }

    #[test]
    fn empty_timeline_shape() {
        let json = serde_json::to_value(TimelineArtifact::default()).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
        assert!(json["date_range"]["start"].is_null());
        assert_eq!(json["total"], 0);
        assert_eq!(json["by_citizenship"], serde_json::json!({}));
    }
}
