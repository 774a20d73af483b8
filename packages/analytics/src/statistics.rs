//! Overall transfer statistics and featured locations.

use journey_map_analytics_models::{
    Camera, FeaturedLocation, LocationKind, OverallStats, RegionFacility, StatisticsArtifact,
};
use journey_map_flow_models::{FacilityRef, FlowSet, RankedFacility, RegionalFlows};
use journey_map_geography::{RegionCluster, km_to_miles, round1};
use journey_map_journey_models::{JourneySummary, PathBuildReport};

/// Member facilities listed under a featured region.
const REGION_FACILITIES_LISTED: usize = 3;

/// Count-weighted average transfer distance plus route totals.
///
/// The average is `sum(distance_km * count) / total_segments`, or 0 when
/// there are no segments, rounded to one decimal in both units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overall_stats(flows: &FlowSet) -> OverallStats {
    let weighted_km: f64 = flows
        .flows
        .iter()
        .map(|f| f.distance.distance_km * f.count as f64)
        .sum();

    let avg_km = if flows.total_segments == 0 {
        0.0
    } else {
        weighted_km / flows.total_segments as f64
    };

    OverallStats {
        avg_transfer_distance_km: round1(avg_km),
        avg_transfer_distance_miles: round1(km_to_miles(avg_km)),
        total_transfers: flows.total_segments,
        unique_routes: flows.unique_routes,
    }
}

/// Featured entry for a region cluster, centered on its centroid.
#[must_use]
pub fn region_location(
    cluster: &RegionCluster,
    regional: &RegionalFlows,
    zoom: f64,
) -> FeaturedLocation {
    let facilities = cluster
        .members()
        .iter()
        .take(REGION_FACILITIES_LISTED)
        .map(|member| RegionFacility {
            facility: FacilityRef::from(&member.facility),
            distance_to_reference_km: member.distance_to_reference.distance_km,
        })
        .collect();

    FeaturedLocation {
        name: cluster.spec().name.clone(),
        kind: LocationKind::Region,
        code: None,
        lat: None,
        lon: None,
        city: None,
        region: None,
        facilities: Some(facilities),
        total_transfers: regional.total_transfers,
        outflows: regional.outflows,
        inflows: regional.inflows,
        top_destinations: regional.top_destinations.clone(),
        top_origins: regional.top_origins.clone(),
        camera: Camera::overhead(regional.centroid, zoom),
    }
}

/// Featured entry for one ranked facility, centered on the facility.
#[must_use]
pub fn facility_location(ranked: &RankedFacility, zoom: f64) -> FeaturedLocation {
    let facility = &ranked.aggregate.facility;

    FeaturedLocation {
        name: facility.name.clone(),
        kind: LocationKind::Facility,
        code: Some(facility.code.clone()),
        lat: Some(facility.lat),
        lon: Some(facility.lon),
        city: Some(facility.city.clone()),
        region: Some(facility.region.clone()),
        facilities: None,
        total_transfers: ranked.total_transfers,
        outflows: ranked.aggregate.outflows,
        inflows: ranked.aggregate.inflows,
        top_destinations: ranked.top_destinations.clone(),
        top_origins: ranked.top_origins.clone(),
        camera: Camera::overhead(facility.coordinate(), zoom),
    }
}

/// Assembles `statistics.json`.
#[must_use]
pub fn compose_statistics(
    flows: &FlowSet,
    featured_locations: Vec<FeaturedLocation>,
    journey_summary: JourneySummary,
    data_quality: PathBuildReport,
) -> StatisticsArtifact {
    let overall_stats = overall_stats(flows);

    log::info!(
        "Average transfer distance {} km over {} transfers, {} featured locations",
        overall_stats.avg_transfer_distance_km,
        overall_stats.total_transfers,
        featured_locations.len(),
    );
    for location in &featured_locations {
        log::debug!(
            "Featured {} '{}': {} out, {} in",
            location.kind,
            location.name,
            location.outflows,
            location.inflows,
        );
    }

    StatisticsArtifact {
        overall_stats,
        featured_locations,
        journey_summary,
        data_quality,
    }
}
