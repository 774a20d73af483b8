#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reconstructs chronological per-individual journey paths.
//!
//! Visit records are validated, joined to the facility directory by exact
//! code, grouped by individual and stably sorted by check-in time. Grouped
//! individuals are processed on the `rayon` pool; output order is fixed by
//! an explicit sort on the individual id afterwards, so results never depend
//! on worker scheduling.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use journey_map_geography::{Distance, distance};
use journey_map_geography_models::{Facility, FacilityDirectory};
use journey_map_journey_models::{
    JourneyPath, JourneySummary, PathBuildReport, VisitRecord, Waypoint,
};
use rayon::prelude::*;

/// Number of unknown facility codes echoed in the data-quality warning.
const MISSING_CODES_LOGGED: usize = 10;

/// Output of [`build_paths`].
#[derive(Debug, Clone, Default)]
pub struct PathBuild {
    /// One path per individual with at least one accepted visit, ordered by
    /// individual id.
    pub paths: Vec<JourneyPath>,
    /// What was accepted and why the rest was dropped.
    pub report: PathBuildReport,
}

/// An accepted visit waiting to be placed in its individual's path.
struct AcceptedVisit<'a> {
    check_in: DateTime<Utc>,
    record: &'a VisitRecord,
    facility: &'a Facility,
}

/// Groups visit records into chronologically ordered paths.
///
/// Records are dropped (and counted in the report) when the individual id is
/// blank, the facility code or check-in is missing, or the facility code is
/// not in `directory`. Visits with equal check-in times keep their input
/// order.
#[must_use]
pub fn build_paths(records: &[VisitRecord], directory: &FacilityDirectory) -> PathBuild {
    let mut report = PathBuildReport {
        total_records: records.len() as u64,
        ..PathBuildReport::default()
    };
    let mut unknown_codes = BTreeSet::new();
    let mut groups: BTreeMap<&str, Vec<AcceptedVisit<'_>>> = BTreeMap::new();

    for record in records {
        let Some(individual_id) = record.valid_individual_id() else {
            report.missing_individual_id += 1;
            continue;
        };
        let Some(code) = record.valid_facility_code() else {
            report.missing_facility_code += 1;
            continue;
        };
        let Some(check_in) = record.check_in else {
            report.missing_check_in += 1;
            continue;
        };
        let Some(facility) = directory.get(code) else {
            report.unknown_facility_records += 1;
            unknown_codes.insert(code);
            continue;
        };

        report.accepted_records += 1;
        groups.entry(individual_id).or_default().push(AcceptedVisit {
            check_in,
            record,
            facility,
        });
    }

    report.unknown_facility_codes = unknown_codes.into_iter().map(str::to_string).collect();

    if report.unknown_facility_records > 0 {
        let sample: Vec<&str> = report
            .unknown_facility_codes
            .iter()
            .take(MISSING_CODES_LOGGED)
            .map(String::as_str)
            .collect();
        log::warn!(
            "{} records reference {} facility codes missing from the directory (first {}): {sample:?}",
            report.unknown_facility_records,
            report.unknown_facility_codes.len(),
            sample.len(),
        );
    }
    if let Some(message) = exclusion_summary(&report) {
        log::warn!("{message}");
    }

    let mut paths: Vec<JourneyPath> = groups
        .into_par_iter()
        .map(|(individual_id, visits)| assemble_path(individual_id, visits))
        .collect();
    paths.sort_by(|a, b| a.individual_id.cmp(&b.individual_id));

    log::info!(
        "Built {} journey paths from {} of {} visit records",
        paths.len(),
        report.accepted_records,
        report.total_records,
    );

    PathBuild { paths, report }
}

fn assemble_path(individual_id: &str, mut visits: Vec<AcceptedVisit<'_>>) -> JourneyPath {
    // Stable: equal check-ins keep input order.
    visits.sort_by_key(|v| v.check_in);

    let demographics = visits
        .first()
        .map(|v| v.record.demographics.clone())
        .unwrap_or_default();

    let waypoints = visits
        .iter()
        .map(|v| Waypoint::at(v.facility, Some(v.check_in)))
        .collect();

    JourneyPath::new(individual_id.to_string(), waypoints, demographics)
}

/// Describes records dropped for missing fields, or `None` if there were
/// none. Unknown facilities are reported separately.
fn exclusion_summary(report: &PathBuildReport) -> Option<String> {
    let missing =
        report.missing_individual_id + report.missing_facility_code + report.missing_check_in;
    (missing > 0).then(|| {
        format!(
            "Excluded {missing} records: {} without an individual id, {} without a facility \
             code, {} without a check-in time",
            report.missing_individual_id, report.missing_facility_code, report.missing_check_in,
        )
    })
}

/// Sum of great-circle distances between consecutive waypoints of a path.
#[must_use]
pub fn path_distance(path: &JourneyPath) -> Distance {
    path.legs()
        .map(|(from, to)| distance(from.coordinate(), to.coordinate()))
        .sum()
}

/// Tallies how many individuals reach each stage of transfer analysis.
#[must_use]
pub fn summarize(paths: &[JourneyPath]) -> JourneySummary {
    paths.iter().fold(JourneySummary::default(), |mut acc, path| {
        acc.individuals += 1;
        if path.has_transfers() {
            acc.individuals_with_multiple_visits += 1;
        }
        if path.unique_facilities >= 2 {
            acc.individuals_with_multiple_facilities += 1;
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use journey_map_geography_models::Coordinate;
    use journey_map_journey_models::Demographics;

    use super::*;

    fn facility(code: &str, lat: f64, lon: f64) -> Facility {
        Facility {
            code: code.to_string(),
            name: format!("{code} Facility"),
            coordinate: Coordinate::new(lat, lon),
            city: "City".to_string(),
            region: "ST".to_string(),
        }
    }

    fn directory() -> FacilityDirectory {
        [facility("F1", 40.0, -75.0), facility("F2", 41.0, -74.0)]
            .into_iter()
            .collect()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn visit(id: &str, code: &str, check_in: Option<DateTime<Utc>>) -> VisitRecord {
        VisitRecord {
            individual_id: Some(id.to_string()),
            facility_code: Some(code.to_string()),
            check_in,
            check_out: None,
            demographics: Demographics::default(),
        }
    }

    fn codes(path: &JourneyPath) -> Vec<&str> {
        path.waypoints
            .iter()
            .map(|w| w.facility_code.as_str())
            .collect()
    }

    #[test]
    fn orders_visits_chronologically() {
        let records = vec![
            visit("A", "F1", Some(day(3))),
            visit("A", "F2", Some(day(2))),
            visit("A", "F1", Some(day(1))),
        ];
        let build = build_paths(&records, &directory());
        assert_eq!(build.paths.len(), 1);
        let path = &build.paths[0];
        assert_eq!(codes(path), vec!["F1", "F2", "F1"]);
        assert_eq!(path.unique_facilities, 2);
        for pair in path.waypoints.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn equal_check_ins_keep_input_order() {
        let records = vec![
            visit("A", "F2", Some(day(1))),
            visit("A", "F1", Some(day(1))),
        ];
        let build = build_paths(&records, &directory());
        assert_eq!(codes(&build.paths[0]), vec!["F2", "F1"]);
    }

    #[test]
    fn unknown_facility_is_dropped_and_reported() {
        let records = vec![
            visit("A", "F1", Some(day(1))),
            visit("A", "NOPE", Some(day(2))),
            visit("B", "NOPE", Some(day(1))),
            visit("B", "ALSO_NOPE", Some(day(2))),
        ];
        let build = build_paths(&records, &directory());
        assert_eq!(build.paths.len(), 1);
        assert_eq!(build.paths[0].waypoint_count(), 1);
        assert_eq!(build.report.unknown_facility_records, 3);
        assert_eq!(
            build.report.unknown_facility_codes,
            vec!["ALSO_NOPE".to_string(), "NOPE".to_string()]
        );
        assert_eq!(build.report.accepted_records, 1);
    }

    #[test]
    fn blank_ids_and_missing_check_ins_are_excluded() {
        let records = vec![
            visit("  ", "F1", Some(day(1))),
            visit("", "F1", Some(day(1))),
            VisitRecord {
                individual_id: None,
                ..visit("x", "F1", Some(day(1)))
            },
            visit("A", "F1", None),
            VisitRecord {
                facility_code: None,
                ..visit("A", "F1", Some(day(1)))
            },
            visit("A", "F2", Some(day(2))),
        ];
        let build = build_paths(&records, &directory());
        assert_eq!(build.report.missing_individual_id, 3);
        assert_eq!(build.report.missing_check_in, 1);
        assert_eq!(build.report.missing_facility_code, 1);
        assert_eq!(build.report.accepted_records, 1);
        assert_eq!(
            build.report.accepted_records + build.report.excluded_records(),
            build.report.total_records
        );
        assert_eq!(codes(&build.paths[0]), vec!["F2"]);
    }

    #[test]
    fn exclusion_summary_names_every_missing_field() {
        let records = vec![
            visit("", "F1", Some(day(1))),
            VisitRecord {
                facility_code: None,
                ..visit("A", "F1", Some(day(1)))
            },
            VisitRecord {
                facility_code: Some("   ".to_string()),
                ..visit("A", "F1", Some(day(2)))
            },
            visit("A", "F1", None),
        ];
        let build = build_paths(&records, &directory());

        let message = exclusion_summary(&build.report).unwrap();
        assert!(message.contains("Excluded 4 records"), "{message}");
        assert!(message.contains("1 without an individual id"), "{message}");
        assert!(message.contains("2 without a facility code"), "{message}");
        assert!(message.contains("1 without a check-in time"), "{message}");
    }

    #[test]
    fn exclusion_summary_is_silent_for_clean_input() {
        let build = build_paths(&[visit("A", "F1", Some(day(1)))], &directory());
        assert_eq!(exclusion_summary(&build.report), None);
    }

    #[test]
    fn demographics_come_from_the_earliest_visit() {
        let mut late = visit("A", "F2", Some(day(5)));
        late.demographics.gender = Some("F".to_string());
        late.demographics.citizenship = Some("Later".to_string());
        let mut early = visit("A", "F1", Some(day(1)));
        early.demographics.gender = Some("M".to_string());
        early.demographics.birth_year = Some(1990);

        let build = build_paths(&[late, early], &directory());
        let demographics = &build.paths[0].demographics;
        assert_eq!(demographics.gender.as_deref(), Some("M"));
        assert_eq!(demographics.birth_year, Some(1990));
        assert_eq!(demographics.citizenship, None);
    }

    #[test]
    fn ids_are_trimmed_before_grouping() {
        let records = vec![visit("A ", "F1", Some(day(1))), visit(" A", "F2", Some(day(2)))];
        let build = build_paths(&records, &directory());
        assert_eq!(build.paths.len(), 1);
        assert_eq!(build.paths[0].individual_id, "A");
    }

    #[test]
    fn paths_are_sorted_by_individual_id() {
        let records = vec![
            visit("C", "F1", Some(day(1))),
            visit("A", "F1", Some(day(1))),
            visit("B", "F1", Some(day(1))),
        ];
        let build = build_paths(&records, &directory());
        let ids: Vec<&str> = build
            .paths
            .iter()
            .map(|p| p.individual_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_input_builds_nothing() {
        let build = build_paths(&[], &directory());
        assert!(build.paths.is_empty());
        assert_eq!(build.report, PathBuildReport::default());
    }

    #[test]
    fn path_distance_follows_the_path_not_the_graph() {
        let records = vec![
            visit("A", "F1", Some(day(1))),
            visit("A", "F2", Some(day(2))),
            visit("A", "F1", Some(day(3))),
        ];
        let build = build_paths(&records, &directory());
        let leg = distance(Coordinate::new(40.0, -75.0), Coordinate::new(41.0, -74.0));
        let total = path_distance(&build.paths[0]);
        assert!((total.distance_km - 2.0 * leg.distance_km).abs() < 1e-9);
    }

    #[test]
    fn summary_counts_stages() {
        let records = vec![
            visit("A", "F1", Some(day(1))),
            visit("A", "F2", Some(day(2))),
            visit("B", "F1", Some(day(1))),
            visit("B", "F1", Some(day(2))),
            visit("C", "F2", Some(day(1))),
        ];
        let build = build_paths(&records, &directory());
        let summary = summarize(&build.paths);
        assert_eq!(
            summary,
            JourneySummary {
                individuals: 3,
                individuals_with_multiple_visits: 2,
                individuals_with_multiple_facilities: 1,
            }
        );
    }
}
