#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Generates the journey map's JSON artifacts from a visit table and a
//! facility table.

use std::path::PathBuf;

use clap::Parser;
use journey_map_cli_utils::IndicatifProgress;
use journey_map_generate::{GenerateArgs, PipelineConfig, STAGE_COUNT, run};

#[derive(Parser)]
#[command(
    name = "journey_map_generate",
    about = "Reconstruct journeys and write flow, highlight, statistics and timeline JSON"
)]
struct Cli {
    /// Visit table CSV (one row per facility stay).
    #[arg(long)]
    visits: PathBuf,

    /// Facility table CSV (code, name, coordinates, location).
    #[arg(long)]
    facilities: PathBuf,

    /// Directory the JSON artifacts are written to.
    #[arg(long, default_value = "data/generated")]
    output_dir: PathBuf,

    /// TOML file whose settings override the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = journey_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = PipelineConfig::load(cli.config.as_deref())?;
    log::debug!("Using config: {config:?}");

    let args = GenerateArgs {
        visits: cli.visits,
        facilities: cli.facilities,
        output_dir: cli.output_dir,
    };

    let stages = IndicatifProgress::stages_bar(&multi, "Generating", STAGE_COUNT);
    let reading = IndicatifProgress::read_spinner(&multi, "Reading visits");

    let artifacts = run(&args, &config, stages.as_ref(), reading.as_ref())?;

    log::info!(
        "Done: {} transfers over {} routes, {} months on the timeline",
        artifacts.flows.total_segments,
        artifacts.flows.unique_routes,
        artifacts.timeline.data.len(),
    );

    Ok(())
}
