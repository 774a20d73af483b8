//! Top-N rankings of individuals and facilities.

use std::collections::{BTreeMap, BTreeSet};

use journey_map_flow_models::{
    FacilityAggregate, FacilityRef, FlowEdge, NeighborFlow, RankedFacility, RankedIndividual,
};
use journey_map_geography::distance;
use journey_map_geography_models::Coordinate;
use journey_map_journey::path_distance;
use journey_map_journey_models::JourneyPath;

/// Ranks individuals with two or more waypoints by distinct facilities
/// visited, then total waypoints, then individual id, and returns the first
/// `limit`.
#[must_use]
pub fn rank_individuals(paths: &[JourneyPath], limit: usize) -> Vec<RankedIndividual> {
    let mut candidates: Vec<&JourneyPath> = paths.iter().filter(|p| p.has_transfers()).collect();

    candidates.sort_by(|a, b| {
        b.unique_facilities
            .cmp(&a.unique_facilities)
            .then_with(|| b.waypoint_count().cmp(&a.waypoint_count()))
            .then_with(|| a.individual_id.cmp(&b.individual_id))
    });

    candidates
        .into_iter()
        .take(limit)
        .map(|path| RankedIndividual {
            total_distance: path_distance(path),
            path: path.clone(),
        })
        .collect()
}

/// Inflow and outflow totals for every facility appearing on any edge,
/// ordered by facility code.
#[must_use]
pub fn facility_aggregates(flows: &[FlowEdge]) -> Vec<FacilityAggregate> {
    let mut totals: BTreeMap<&str, FacilityAggregate> = BTreeMap::new();

    for flow in flows {
        totals
            .entry(flow.origin.code.as_str())
            .or_insert_with(|| empty_aggregate(&flow.origin))
            .outflows += flow.count;
        totals
            .entry(flow.destination.code.as_str())
            .or_insert_with(|| empty_aggregate(&flow.destination))
            .inflows += flow.count;
    }

    totals.into_values().collect()
}

fn empty_aggregate(facility: &FacilityRef) -> FacilityAggregate {
    FacilityAggregate {
        facility: facility.clone(),
        outflows: 0,
        inflows: 0,
    }
}

/// Ranks facilities not in `excluded` by total transfer volume (code breaks
/// ties) and attaches each one's top `neighbor_limit` destinations and
/// origins.
///
/// Excluded facilities still count towards their neighbors' totals and still
/// appear in neighbor lists.
#[must_use]
pub fn rank_facilities(
    flows: &[FlowEdge],
    excluded: &BTreeSet<String>,
    limit: usize,
    neighbor_limit: usize,
) -> Vec<RankedFacility> {
    let mut aggregates: Vec<FacilityAggregate> = facility_aggregates(flows)
        .into_iter()
        .filter(|a| !excluded.contains(&a.facility.code))
        .collect();

    aggregates.sort_by(|a, b| {
        b.total_transfers()
            .cmp(&a.total_transfers())
            .then_with(|| a.facility.code.cmp(&b.facility.code))
    });
    aggregates.truncate(limit);

    aggregates
        .into_iter()
        .map(|aggregate| {
            let code = aggregate.facility.code.as_str();
            let from = aggregate.facility.coordinate();

            let top_destinations = top_neighbors(
                flows
                    .iter()
                    .filter(|f| f.origin.code == code)
                    .map(|f| (&f.destination, f.count)),
                from,
                neighbor_limit,
            );
            let top_origins = top_neighbors(
                flows
                    .iter()
                    .filter(|f| f.destination.code == code)
                    .map(|f| (&f.origin, f.count)),
                from,
                neighbor_limit,
            );

            RankedFacility {
                total_transfers: aggregate.total_transfers(),
                aggregate,
                top_destinations,
                top_origins,
            }
        })
        .collect()
}

/// Sums counts per neighbor code and returns the busiest `limit`, ordered
/// by count descending then code, with distances from `from`.
pub(crate) fn top_neighbors<'a>(
    neighbors: impl IntoIterator<Item = (&'a FacilityRef, u64)>,
    from: Coordinate,
    limit: usize,
) -> Vec<NeighborFlow> {
    let mut totals: BTreeMap<&str, (&FacilityRef, u64)> = BTreeMap::new();
    for (facility, count) in neighbors {
        totals.entry(facility.code.as_str()).or_insert((facility, 0)).1 += count;
    }

    let mut ranked: Vec<(&FacilityRef, u64)> = totals.into_values().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.code.cmp(&b.0.code)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(facility, count)| NeighborFlow {
            distance: distance(from, facility.coordinate()),
            facility: facility.clone(),
            count,
        })
        .collect()
}
