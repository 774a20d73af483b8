//! Edge counting and weight scaling.

use std::collections::{BTreeMap, btree_map::Entry};

use journey_map_flow_models::{FacilityRef, FlowEdge, FlowSet};
use journey_map_geography::distance;
use journey_map_journey_models::{JourneyPath, Waypoint};
use rayon::prelude::*;

#[derive(Debug, Clone)]
struct EdgeEntry {
    origin: FacilityRef,
    destination: FacilityRef,
    count: u64,
}

/// Transition counts keyed by `(origin code, destination code)`.
///
/// Partial maps built on separate workers combine with [`EdgeCounts::merge`],
/// which adds counts and is commutative and associative.
#[derive(Debug, Clone, Default)]
pub struct EdgeCounts {
    edges: BTreeMap<(String, String), EdgeEntry>,
}

impl EdgeCounts {
    /// Counts one transition. Same-facility pairs are ignored.
    pub fn record(&mut self, from: &Waypoint, to: &Waypoint) {
        if from.facility_code == to.facility_code {
            return;
        }

        self.edges
            .entry((from.facility_code.clone(), to.facility_code.clone()))
            .and_modify(|edge| edge.count += 1)
            .or_insert_with(|| EdgeEntry {
                origin: FacilityRef::from(from),
                destination: FacilityRef::from(to),
                count: 1,
            });
    }

    /// Adds every count in `other` to `self`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (key, edge) in other.edges {
            match self.edges.entry(key) {
                Entry::Occupied(mut existing) => existing.get_mut().count += edge.count,
                Entry::Vacant(slot) => {
                    slot.insert(edge);
                }
            }
        }
        self
    }

    /// Count for one origin/destination pair, or 0.
    #[must_use]
    pub fn get(&self, origin: &str, destination: &str) -> u64 {
        self.edges
            .get(&(origin.to_string(), destination.to_string()))
            .map_or(0, |edge| edge.count)
    }

    /// Number of distinct origin/destination pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no transitions were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.edges.values().map(|edge| edge.count).sum()
    }
}

/// Counts every consecutive-waypoint transfer across all paths with two or
/// more waypoints.
#[must_use]
pub fn count_transitions(paths: &[JourneyPath]) -> EdgeCounts {
    paths
        .par_iter()
        .filter(|path| path.has_transfers())
        .fold(EdgeCounts::default, |mut counts, path| {
            for (from, to) in path.legs() {
                counts.record(from, to);
            }
            counts
        })
        .reduce(EdgeCounts::default, EdgeCounts::merge)
}

/// Maps `count` linearly from `min..=max` onto `1..=max_scaled`.
///
/// Every count scales to 1 when `max == min`. A `max_scaled` of 0 is
/// treated as 1.
#[must_use]
pub fn scale_count(count: u64, min: u64, max: u64, max_scaled: u32) -> u32 {
    let max_scaled = max_scaled.max(1);
    if max <= min {
        return 1;
    }

    let offset = count.saturating_sub(min).min(max - min);
    let scaled = offset * u64::from(max_scaled - 1) / (max - min) + 1;
    u32::try_from(scaled).unwrap_or(max_scaled).max(1)
}

/// Builds the full weighted edge set.
///
/// Edges are ordered by count descending, then origin code, then destination
/// code.
#[must_use]
pub fn aggregate_flows(paths: &[JourneyPath], max_scaled: u32) -> FlowSet {
    let counts = count_transitions(paths);

    let min = counts.edges.values().map(|e| e.count).min().unwrap_or(0);
    let max = counts.edges.values().map(|e| e.count).max().unwrap_or(0);

    let mut flows: Vec<FlowEdge> = counts
        .edges
        .into_values()
        .map(|edge| FlowEdge {
            distance: distance(edge.origin.coordinate(), edge.destination.coordinate()),
            scaled_count: scale_count(edge.count, min, max, max_scaled),
            count: edge.count,
            origin: edge.origin,
            destination: edge.destination,
        })
        .collect();

    flows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.origin.code.cmp(&b.origin.code))
            .then_with(|| a.destination.code.cmp(&b.destination.code))
    });

    let total_segments = flows.iter().map(|f| f.count).sum();
    let unique_routes = flows.len() as u64;

    log::info!("Aggregated {total_segments} transfers over {unique_routes} routes");

    FlowSet {
        flows,
        total_segments,
        unique_routes,
    }
}
