//! Highlighted individuals and their story data.

use journey_map_analytics_models::{Highlight, HighlightsArtifact, StoryData};
use journey_map_flow_models::RankedIndividual;
use journey_map_journey_models::{Waypoint, timestamp};

/// Builds `highlights.json` from already-ranked individuals.
///
/// `max_transfers` is the distinct-facility count of the first (top-ranked)
/// individual, or 0 when nobody qualifies.
#[must_use]
pub fn build_highlights(ranked: &[RankedIndividual]) -> HighlightsArtifact {
    HighlightsArtifact {
        highlights: ranked.iter().map(highlight).collect(),
        max_transfers: ranked.first().map_or(0, |r| r.path.unique_facilities),
    }
}

fn highlight(ranked: &RankedIndividual) -> Highlight {
    let path = &ranked.path;
    let demographics = path.demographics.clone();
    let first = path.first();
    let last = path.last();

    Highlight {
        individual_id: path.individual_id.clone(),
        path: path.waypoints.clone(),
        transfer_count: path.waypoint_count(),
        unique_facilities: path.unique_facilities,
        story_data: StoryData {
            gender: demographics.gender,
            birth_year: demographics.birth_year,
            citizenship: demographics.citizenship,
            ethnicity: demographics.ethnicity,
            first_facility: first.map(|w| w.facility_name.clone()),
            first_region: first.map(|w| w.region.clone()),
            first_date: first.and_then(date),
            last_facility: last.map(|w| w.facility_name.clone()),
            last_region: last.map(|w| w.region.clone()),
            last_date: last.and_then(date),
            total_distance_km: ranked.total_distance.distance_km,
            total_distance_miles: ranked.total_distance.distance_miles,
        },
    }
}

fn date(waypoint: &Waypoint) -> Option<String> {
    waypoint.timestamp.as_ref().map(timestamp::format)
}
