#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Composes the presentation artifacts from paths, flows and rankings.
//!
//! Every function here is pure: it takes already-computed journey and flow
//! results and shapes them into the types serialized by the generator.

pub mod highlights;
pub mod statistics;
pub mod timeline;

pub use highlights::build_highlights;
pub use statistics::{compose_statistics, facility_location, overall_stats, region_location};
pub use timeline::{UNKNOWN_CITIZENSHIP, monthly_timeline};
