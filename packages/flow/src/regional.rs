//! Flows crossing the boundary of a region cluster.

use journey_map_flow_models::{FlowEdge, RegionalFlows};
use journey_map_geography::RegionCluster;

use crate::ranking::top_neighbors;

/// Splits edges into those leaving and those entering `cluster`.
///
/// Edges with both ends inside the cluster are internal and ignored, as are
/// edges with neither end inside. Neighbor distances are measured from the
/// cluster centroid.
#[must_use]
pub fn regional_flows(
    cluster: &RegionCluster,
    flows: &[FlowEdge],
    neighbor_limit: usize,
) -> RegionalFlows {
    let leaving: Vec<&FlowEdge> = flows
        .iter()
        .filter(|f| cluster.contains(&f.origin.code) && !cluster.contains(&f.destination.code))
        .collect();
    let entering: Vec<&FlowEdge> = flows
        .iter()
        .filter(|f| !cluster.contains(&f.origin.code) && cluster.contains(&f.destination.code))
        .collect();

    let outflows: u64 = leaving.iter().map(|f| f.count).sum();
    let inflows: u64 = entering.iter().map(|f| f.count).sum();
    let centroid = cluster.centroid();

    log::debug!(
        "Region '{}': {outflows} transfers out, {inflows} transfers in",
        cluster.spec().name
    );

    RegionalFlows {
        outflows,
        inflows,
        total_transfers: outflows + inflows,
        top_destinations: top_neighbors(
            leaving.iter().map(|f| (&f.destination, f.count)),
            centroid,
            neighbor_limit,
        ),
        top_origins: top_neighbors(
            entering.iter().map(|f| (&f.origin, f.count)),
            centroid,
            neighbor_limit,
        ),
        centroid,
    }
}
