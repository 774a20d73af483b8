#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating the journey map's JSON artifacts from visit and
//! facility tables.
//!
//! The pipeline reads both tables, rebuilds each individual's chronological
//! path, aggregates facility-to-facility transfers, ranks individuals and
//! facilities, rolls flows up across the featured region's boundary, and
//! writes four pretty-printed JSON files:
//!
//! * `flows.json`: every directed route with counts and distances
//! * `highlights.json`: the top-ranked individuals and their stories
//! * `statistics.json`: overall numbers, featured locations, data quality
//! * `timeline.json`: monthly visit counts
//!
//! Each file is written to a `.tmp` sibling first and then renamed, so a
//! reader never sees a partially written artifact.

pub mod config;

use std::path::{Path, PathBuf};

use journey_map_analytics::{
    build_highlights, compose_statistics, facility_location, monthly_timeline, region_location,
};
use journey_map_analytics_models::{
    FeaturedLocation, FlowSet, HighlightsArtifact, StatisticsArtifact, TimelineArtifact,
};
use journey_map_flow::{aggregate_flows, rank_facilities, rank_individuals, regional_flows};
use journey_map_geography::RegionCluster;
use journey_map_geography_models::FacilityDirectory;
use journey_map_journey::{build_paths, summarize};
use journey_map_journey_models::VisitRecord;
use journey_map_source::progress::ProgressCallback;
use journey_map_source::{SourceError, load_facilities, load_visits};
use serde::Serialize;

pub use config::PipelineConfig;

/// File name of the flow graph artifact.
pub const OUTPUT_FLOWS: &str = "flows.json";

/// File name of the highlighted individuals artifact.
pub const OUTPUT_HIGHLIGHTS: &str = "highlights.json";

/// File name of the statistics artifact.
pub const OUTPUT_STATISTICS: &str = "statistics.json";

/// File name of the monthly timeline artifact.
pub const OUTPUT_TIMELINE: &str = "timeline.json";

/// Number of stages reported by [`run`].
pub const STAGE_COUNT: u64 = 4;

/// Errors that can occur while generating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Reading an input table failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The config file is not valid TOML or does not match the schema.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A config value is out of range.
    #[error("Invalid config: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Serializing an artifact failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Visit table CSV.
    pub visits: PathBuf,
    /// Facility table CSV.
    pub facilities: PathBuf,
    /// Directory the JSON artifacts are written to. Created if missing.
    pub output_dir: PathBuf,
}

/// Everything the pipeline produces, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    /// Contents of `flows.json`.
    pub flows: FlowSet,
    /// Contents of `highlights.json`.
    pub highlights: HighlightsArtifact,
    /// Contents of `statistics.json`.
    pub statistics: StatisticsArtifact,
    /// Contents of `timeline.json`.
    pub timeline: TimelineArtifact,
}

/// Runs the whole pipeline: read, compute, write.
///
/// `stages` advances once per pipeline stage ([`STAGE_COUNT`] in total);
/// `reading` tracks bytes read from the visit table.
///
/// # Errors
///
/// Returns [`GenerateError`] if an input table cannot be read or an artifact
/// cannot be written.
pub fn run(
    args: &GenerateArgs,
    config: &PipelineConfig,
    stages: &dyn ProgressCallback,
    reading: &dyn ProgressCallback,
) -> Result<Artifacts, GenerateError> {
    stages.set_message("Reading facilities".to_string());
    let directory = load_facilities(&args.facilities)?;
    stages.inc(1);

    stages.set_message("Reading visits".to_string());
    let records = load_visits(&args.visits, reading)?;
    stages.inc(1);

    stages.set_message("Reconstructing journeys".to_string());
    let artifacts = build_artifacts(&records, &directory, config);
    stages.inc(1);

    stages.set_message("Writing artifacts".to_string());
    write_artifacts(&args.output_dir, &artifacts)?;
    stages.inc(1);

    stages.finish(format!(
        "Wrote {} routes and {} highlights to {}",
        artifacts.flows.unique_routes,
        artifacts.highlights.highlights.len(),
        args.output_dir.display()
    ));

    Ok(artifacts)
}

/// Computes every artifact from already-loaded tables.
///
/// Deterministic: identical inputs always produce identical artifacts.
#[must_use]
pub fn build_artifacts(
    records: &[VisitRecord],
    directory: &FacilityDirectory,
    config: &PipelineConfig,
) -> Artifacts {
    let build = build_paths(records, directory);
    let paths = &build.paths;

    let flows = aggregate_flows(paths, config.max_scaled_count);

    let cluster = RegionCluster::build(config.region.spec(), directory);
    let regional = regional_flows(&cluster, &flows.flows, config.neighbor_count);
    let ranked_facilities = rank_facilities(
        &flows.flows,
        cluster.member_codes(),
        config.featured_facility_count,
        config.neighbor_count,
    );

    let mut featured: Vec<FeaturedLocation> = Vec::with_capacity(ranked_facilities.len() + 1);
    featured.push(region_location(&cluster, &regional, config.region.zoom));
    featured.extend(
        ranked_facilities
            .iter()
            .map(|ranked| facility_location(ranked, config.facility_zoom)),
    );

    let summary = summarize(paths);
    log::info!(
        "{} individuals, {} with two or more visits, {} seen at two or more facilities",
        summary.individuals,
        summary.individuals_with_multiple_visits,
        summary.individuals_with_multiple_facilities,
    );

    let highlights = build_highlights(&rank_individuals(paths, config.highlight_count));
    let timeline = monthly_timeline(paths, config.timeline.start_month.as_deref());
    let statistics = compose_statistics(&flows, featured, summary, build.report);

    Artifacts {
        flows,
        highlights,
        statistics,
        timeline,
    }
}

/// Writes all four artifacts into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`GenerateError`] if the directory cannot be created or a file
/// cannot be serialized or written.
pub fn write_artifacts(dir: &Path, artifacts: &Artifacts) -> Result<(), GenerateError> {
    std::fs::create_dir_all(dir).map_err(|e| GenerateError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    write_json(dir, OUTPUT_FLOWS, &artifacts.flows)?;
    write_json(dir, OUTPUT_HIGHLIGHTS, &artifacts.highlights)?;
    write_json(dir, OUTPUT_STATISTICS, &artifacts.statistics)?;
    write_json(dir, OUTPUT_TIMELINE, &artifacts.timeline)?;

    Ok(())
}

/// Writes `value` as pretty-printed JSON to `dir/name`.
///
/// Uses an atomic write pattern (write to `.tmp`, then rename) to avoid
/// corrupt artifacts from interrupted writes.
fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), GenerateError> {
    let path = dir.join(name);
    let tmp_path = dir.join(format!("{name}.tmp"));
    let contents = serde_json::to_string_pretty(value)?;

    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source| GenerateError::Io { path, source }
    };
    std::fs::write(&tmp_path, contents).map_err(io_err(&tmp_path))?;
    std::fs::rename(&tmp_path, &path).map_err(io_err(&path))?;

    log::info!("Wrote {}", path.display());
    Ok(())
}
