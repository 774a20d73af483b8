//! Monthly visit counts.

use std::collections::BTreeMap;

use journey_map_analytics_models::{DateRange, TimelineArtifact, TimelinePoint};
use journey_map_journey_models::JourneyPath;

/// Group key for individuals with no recorded citizenship.
pub const UNKNOWN_CITIZENSHIP: &str = "Unknown";

/// Counts accepted check-ins per `YYYY-MM` month, overall and per
/// citizenship country.
///
/// When `start_month` is set, earlier months are dropped. Months compare as
/// strings, which is chronological for the `YYYY-MM` form.
#[must_use]
pub fn monthly_timeline(paths: &[JourneyPath], start_month: Option<&str>) -> TimelineArtifact {
    let mut overall: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_citizenship: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

    for path in paths {
        let citizenship = path
            .demographics
            .citizenship
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITIZENSHIP);

        for waypoint in &path.waypoints {
            let Some(ts) = waypoint.timestamp else {
                continue;
            };
            let month = ts.format("%Y-%m").to_string();
            if start_month.is_some_and(|start| month.as_str() < start) {
                continue;
            }

            *by_citizenship
                .entry(citizenship.to_string())
                .or_default()
                .entry(month.clone())
                .or_default() += 1;
            *overall.entry(month).or_default() += 1;
        }
    }

    let data = points(overall);
    let date_range = DateRange {
        start: data.first().map(|p| p.date.clone()),
        end: data.last().map(|p| p.date.clone()),
    };
    let total = data.iter().map(|p| p.visits).sum();

    log::debug!(
        "Timeline covers {} months and {} citizenship groups",
        data.len(),
        by_citizenship.len()
    );

    TimelineArtifact {
        data,
        date_range,
        total,
        by_citizenship: by_citizenship
            .into_iter()
            .map(|(country, months)| (country, points(months)))
            .collect(),
    }
}

fn points(months: BTreeMap<String, u64>) -> Vec<TimelinePoint> {
    months
        .into_iter()
        .map(|(date, visits)| TimelinePoint { date, visits })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use journey_map_journey_models::{Demographics, Waypoint};

    use super::*;

    fn waypoint(year: i32, month: u32) -> Waypoint {
        Waypoint {
            facility_code: "F1".to_string(),
            facility_name: "F1 Facility".to_string(),
            lat: 40.0,
            lon: -75.0,
            city: String::new(),
            region: String::new(),
            timestamp: Some(Utc.with_ymd_and_hms(year, month, 15, 0, 0, 0).unwrap()),
        }
    }

    fn path(id: &str, citizenship: Option<&str>, months: &[(i32, u32)]) -> JourneyPath {
        JourneyPath::new(
            id.to_string(),
            months.iter().map(|&(y, m)| waypoint(y, m)).collect(),
            Demographics {
                citizenship: citizenship.map(str::to_string),
                ..Demographics::default()
            },
        )
    }

    fn series(points: &[TimelinePoint]) -> Vec<(&str, u64)> {
        points.iter().map(|p| (p.date.as_str(), p.visits)).collect()
    }

    #[test]
    fn counts_visits_per_month_in_order() {
        let paths = vec![
            path("A", Some("Mexico"), &[(2024, 2), (2023, 12), (2024, 2)]),
            path("B", Some("Honduras"), &[(2023, 12)]),
        ];
        let timeline = monthly_timeline(&paths, None);

        assert_eq!(series(&timeline.data), vec![("2023-12", 2), ("2024-02", 2)]);
        assert_eq!(timeline.total, 4);
        assert_eq!(timeline.date_range.start.as_deref(), Some("2023-12"));
        assert_eq!(timeline.date_range.end.as_deref(), Some("2024-02"));

        let groups: Vec<&str> = timeline.by_citizenship.keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["Honduras", "Mexico"]);
        assert_eq!(
            series(&timeline.by_citizenship["Mexico"]),
            vec![("2023-12", 1), ("2024-02", 2)]
        );
    }

    #[test]
    fn start_month_drops_earlier_visits() {
        let paths = vec![path("A", None, &[(2023, 8), (2023, 9), (2023, 10)])];
        let timeline = monthly_timeline(&paths, Some("2023-09"));
        assert_eq!(series(&timeline.data), vec![("2023-09", 1), ("2023-10", 1)]);
        assert_eq!(timeline.total, 2);
    }

    #[test]
    fn missing_citizenship_is_grouped_as_unknown() {
        let paths = vec![path("A", Some("  "), &[(2024, 1)]), path("B", None, &[(2024, 1)])];
        let timeline = monthly_timeline(&paths, None);
        assert_eq!(
            series(&timeline.by_citizenship[UNKNOWN_CITIZENSHIP]),
            vec![("2024-01", 2)]
        );
    }

    #[test]
    fn no_paths_gives_empty_timeline() {
        assert_eq!(monthly_timeline(&[], None), TimelineArtifact::default());
    }
}
