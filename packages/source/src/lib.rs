#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reads the visit and facility tables.
//!
//! Both tables are CSV files with a header row. Column names follow either
//! the short snake-case form (`individual_id`, `code`, ...) or the original
//! export headers (`Unique Identifier`, `detention_facility_code`, ...).
//! Individual bad values become `None` and are dealt with downstream; a
//! table that cannot be opened or lacks a required column is an error.

pub mod facilities;
pub mod parsing;
pub mod progress;
pub mod visits;

pub use facilities::{load_facilities, read_facilities};
pub use visits::{load_visits, read_visits};

/// Errors that can occur while reading an input table.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// CSV decoding failed.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path or label of the table.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// I/O error opening or reading a table.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path of the table.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required column is missing from the header row.
    #[error("{path} has no '{column}' column")]
    MissingColumn {
        /// Path or label of the table.
        path: String,
        /// Preferred name of the missing column.
        column: String,
    },
}

/// Checks that every required column (or one of its aliases) is present.
///
/// Each entry of `required` lists the accepted names for one column, the
/// preferred name first.
fn require_columns(
    headers: &csv::StringRecord,
    required: &[&[&str]],
    label: &str,
) -> Result<(), SourceError> {
    for names in required {
        if !headers.iter().any(|h| names.contains(&h.trim())) {
            return Err(SourceError::MissingColumn {
                path: label.to_string(),
                column: names.first().copied().unwrap_or_default().to_string(),
            });
        }
    }
    Ok(())
}

fn open(path: &std::path::Path) -> Result<std::fs::File, SourceError> {
    std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}
