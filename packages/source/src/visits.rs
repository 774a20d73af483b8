//! Visit table reader.

use std::io::Read;
use std::path::Path;

use journey_map_journey_models::{Demographics, VisitRecord};
use serde::Deserialize;

use crate::parsing::{non_empty, parse_timestamp, parse_year};
use crate::progress::ProgressCallback;
use crate::{SourceError, csv_reader, open, require_columns};

/// Columns a visit table must have, each with its accepted aliases.
const REQUIRED_COLUMNS: &[&[&str]] = &[
    &["individual_id", "Unique Identifier"],
    &["facility_code", "Detention Facility Code"],
    &["check_in", "Stay Book In Date Time"],
];

/// Rows between progress updates.
const PROGRESS_BATCH: u64 = 10_000;

/// A raw row from a visit table.
#[derive(Debug, Deserialize)]
struct VisitRow {
    #[serde(alias = "Unique Identifier", default)]
    individual_id: Option<String>,
    #[serde(alias = "Detention Facility Code", default)]
    facility_code: Option<String>,
    #[serde(alias = "Stay Book In Date Time", default)]
    check_in: Option<String>,
    #[serde(alias = "Stay Book Out Date Time", default)]
    check_out: Option<String>,
    #[serde(alias = "Gender", default)]
    gender: Option<String>,
    #[serde(alias = "Birth Year", default)]
    birth_year: Option<String>,
    #[serde(alias = "Citizenship Country", default)]
    citizenship: Option<String>,
    #[serde(alias = "Ethnicity", default)]
    ethnicity: Option<String>,
}

impl VisitRow {
    /// Converts the row, counting check-in values that were present but
    /// unparseable.
    fn into_record(self, unparsed_check_ins: &mut u64) -> VisitRecord {
        let check_in_raw = non_empty(self.check_in);
        let check_in = check_in_raw.as_deref().and_then(parse_timestamp);
        if check_in_raw.is_some() && check_in.is_none() {
            *unparsed_check_ins += 1;
        }

        VisitRecord {
            individual_id: self.individual_id,
            facility_code: non_empty(self.facility_code),
            check_in,
            check_out: self.check_out.as_deref().and_then(parse_timestamp),
            demographics: Demographics {
                gender: non_empty(self.gender),
                birth_year: self.birth_year.as_deref().and_then(parse_year),
                citizenship: non_empty(self.citizenship),
                ethnicity: non_empty(self.ethnicity),
            },
        }
    }
}

/// Reads every row of the visit table at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, is not valid CSV,
/// or lacks an individual id, facility code or check-in column.
pub fn load_visits(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<VisitRecord>, SourceError> {
    log::info!("Reading visits from {}", path.display());
    let file = open(path)?;
    if let Ok(metadata) = file.metadata() {
        progress.set_total(metadata.len());
    }
    read_visits(file, &path.display().to_string(), progress)
}

/// Reads every row of a visit table from any reader. `label` names the
/// table in errors and log messages.
///
/// Rows that cannot be decoded at all are skipped with a warning; bad
/// individual values become `None`. Progress is reported in bytes consumed,
/// every [`PROGRESS_BATCH`] rows.
///
/// # Errors
///
/// Returns [`SourceError`] if the header row cannot be read or a required
/// column is missing.
pub fn read_visits(
    reader: impl Read,
    label: &str,
    progress: &dyn ProgressCallback,
) -> Result<Vec<VisitRecord>, SourceError> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(|e| SourceError::Csv {
        path: label.to_string(),
        source: e,
    })?;
    require_columns(headers, REQUIRED_COLUMNS, label)?;

    progress.set_message(format!("Reading {label}"));

    let mut records = Vec::new();
    let mut rows = 0u64;
    let mut malformed = 0u64;
    let mut unparsed_check_ins = 0u64;
    let mut reported_bytes = 0u64;

    let mut row_iter = reader.deserialize::<VisitRow>();
    while let Some(result) = row_iter.next() {
        match result {
            Ok(row) => records.push(row.into_record(&mut unparsed_check_ins)),
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                malformed += 1;
            }
        }
        rows += 1;
        if rows.is_multiple_of(PROGRESS_BATCH) {
            let consumed = row_iter.reader().position().byte();
            progress.inc(consumed.saturating_sub(reported_bytes));
            reported_bytes = consumed;
        }
    }
    let consumed = row_iter.reader().position().byte();
    progress.inc(consumed.saturating_sub(reported_bytes));

    if malformed > 0 {
        log::warn!("Skipped {malformed} malformed rows in {label}");
    }
    if unparsed_check_ins > 0 {
        log::warn!("{unparsed_check_ins} check-in values in {label} could not be parsed");
    }

    progress.finish(format!("Read {} visit records ({rows} rows)", records.len()));
    log::info!("Read {} visit records from {label}", records.len());

    Ok(records)
}
