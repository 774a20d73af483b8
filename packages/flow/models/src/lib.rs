#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flow edge, facility aggregate and ranking result types.
//!
//! A [`FlowEdge`] is the number of transfers from one facility directly to
//! another across every individual's path. Rankings and regional rollups
//! are derived views over the full edge set.

use journey_map_geography_models::{Coordinate, Distance, Facility};
use journey_map_journey_models::{JourneyPath, Waypoint};
use serde::{Deserialize, Serialize};

/// Facility metadata as it appears on either end of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRef {
    /// Facility code.
    pub code: String,
    /// Facility name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// City.
    pub city: String,
    /// Region.
    pub region: String,
}

impl FacilityRef {
    /// The facility's coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

impl From<&Facility> for FacilityRef {
    fn from(facility: &Facility) -> Self {
        Self {
            code: facility.code.clone(),
            name: facility.name.clone(),
            lat: facility.coordinate.lat,
            lon: facility.coordinate.lon,
            city: facility.city.clone(),
            region: facility.region.clone(),
        }
    }
}

impl From<&Waypoint> for FacilityRef {
    fn from(waypoint: &Waypoint) -> Self {
        Self {
            code: waypoint.facility_code.clone(),
            name: waypoint.facility_name.clone(),
            lat: waypoint.lat,
            lon: waypoint.lon,
            city: waypoint.city.clone(),
            region: waypoint.region.clone(),
        }
    }
}

/// Aggregated transfers from `origin` directly to `destination`.
///
/// Never a self-loop: `origin.code != destination.code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Where individuals were transferred from.
    pub origin: FacilityRef,
    /// Where individuals were transferred to.
    pub destination: FacilityRef,
    /// Number of transitions along this edge.
    pub count: u64,
    /// Count linearly mapped onto `1..=K` for visual encoding.
    pub scaled_count: u32,
    /// Great-circle distance between the endpoints.
    #[serde(flatten)]
    pub distance: Distance,
}

/// The complete flow graph in reporting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSet {
    /// Edges sorted by count descending, then origin code, then destination
    /// code.
    pub flows: Vec<FlowEdge>,
    /// Sum of all edge counts (total qualifying transitions).
    pub total_segments: u64,
    /// Number of distinct origin/destination pairs.
    pub unique_routes: u64,
}

/// Inflow and outflow volume of a single facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityAggregate {
    /// The facility.
    #[serde(flatten)]
    pub facility: FacilityRef,
    /// Transfers leaving this facility.
    pub outflows: u64,
    /// Transfers arriving at this facility.
    pub inflows: u64,
}

impl FacilityAggregate {
    /// Combined inflow and outflow volume.
    #[must_use]
    pub const fn total_transfers(&self) -> u64 {
        self.outflows + self.inflows
    }
}

/// One neighbor of a facility or region with the transfer volume exchanged
/// and its distance from the reference location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborFlow {
    /// The neighboring facility.
    #[serde(flatten)]
    pub facility: FacilityRef,
    /// Transfers exchanged in the reported direction.
    pub count: u64,
    /// Distance from the facility or region centroid being described.
    #[serde(flatten)]
    pub distance: Distance,
}

/// A top-ranked facility with its busiest neighbors in each direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    /// Volume totals.
    #[serde(flatten)]
    pub aggregate: FacilityAggregate,
    /// Combined inflow and outflow volume.
    pub total_transfers: u64,
    /// Busiest destinations of transfers out of this facility.
    pub top_destinations: Vec<NeighborFlow>,
    /// Busiest origins of transfers into this facility.
    pub top_origins: Vec<NeighborFlow>,
}

/// A top-ranked individual and the distance they traveled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIndividual {
    /// The individual's full path.
    pub path: JourneyPath,
    /// Sum of consecutive-waypoint distances along the path.
    pub total_distance: Distance,
}

/// Flows crossing the boundary of a region cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalFlows {
    /// Transfers from a member facility to a non-member.
    pub outflows: u64,
    /// Transfers from a non-member facility to a member.
    pub inflows: u64,
    /// `outflows + inflows`.
    pub total_transfers: u64,
    /// Busiest outside destinations, with distance from the centroid.
    pub top_destinations: Vec<NeighborFlow>,
    /// Busiest outside origins, with distance from the centroid.
    pub top_origins: Vec<NeighborFlow>,
    /// Point all distances above are measured from.
    pub centroid: Coordinate,
}
