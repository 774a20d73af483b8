//! Facility table reader.

use std::io::Read;
use std::path::Path;

use journey_map_geography_models::{Coordinate, Facility, FacilityDirectory};
use serde::Deserialize;

use crate::parsing::{non_empty, parse_coordinate};
use crate::{SourceError, csv_reader, open, require_columns};

/// Columns a facility table must have, each with its accepted aliases.
const REQUIRED_COLUMNS: &[&[&str]] = &[
    &["code", "detention_facility_code"],
    &["latitude"],
    &["longitude"],
];

/// A raw row from a facility table.
#[derive(Debug, Deserialize)]
struct FacilityRow {
    #[serde(alias = "detention_facility_code", default)]
    code: Option<String>,
    #[serde(alias = "detention_facility_name", default)]
    name: Option<String>,
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(alias = "state", default)]
    region: Option<String>,
}

/// Why a facility row was not added to the directory.
enum Rejection {
    MissingCode,
    MissingCoordinates,
}

impl FacilityRow {
    fn into_facility(self) -> Result<Facility, Rejection> {
        let code = non_empty(self.code).ok_or(Rejection::MissingCode)?;
        let (lat, lon) = parse_coordinate(self.latitude.as_deref(), self.longitude.as_deref())
            .ok_or(Rejection::MissingCoordinates)?;

        Ok(Facility {
            name: non_empty(self.name).unwrap_or_else(|| code.clone()),
            code,
            coordinate: Coordinate::new(lat, lon),
            city: non_empty(self.city).unwrap_or_default(),
            region: non_empty(self.region).unwrap_or_default(),
        })
    }
}

/// Reads the facility table at `path` into a directory.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, is not valid CSV,
/// or lacks a code, latitude or longitude column.
pub fn load_facilities(path: &Path) -> Result<FacilityDirectory, SourceError> {
    log::info!("Reading facilities from {}", path.display());
    read_facilities(open(path)?, &path.display().to_string())
}

/// Reads a facility table from any reader. `label` names the table in
/// errors and log messages.
///
/// Rows without a code or usable coordinates are skipped. When a code
/// appears more than once, the first row wins. Both cases are logged.
///
/// # Errors
///
/// Returns [`SourceError`] if the header row cannot be read or a required
/// column is missing.
pub fn read_facilities(reader: impl Read, label: &str) -> Result<FacilityDirectory, SourceError> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(|e| SourceError::Csv {
        path: label.to_string(),
        source: e,
    })?;
    require_columns(headers, REQUIRED_COLUMNS, label)?;

    let mut directory = FacilityDirectory::new();
    let mut malformed = 0u64;
    let mut missing_code = 0u64;
    let mut missing_coordinates = Vec::new();
    let mut duplicates = Vec::new();

    for result in reader.deserialize::<FacilityRow>() {
        let row: FacilityRow = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                malformed += 1;
                continue;
            }
        };

        let code = row.code.clone().unwrap_or_default();
        match row.into_facility() {
            Ok(facility) => {
                if !directory.insert(facility) {
                    duplicates.push(code);
                }
            }
            Err(Rejection::MissingCode) => missing_code += 1,
            Err(Rejection::MissingCoordinates) => missing_coordinates.push(code),
        }
    }

    if malformed > 0 || missing_code > 0 {
        log::warn!("Skipped {malformed} malformed rows and {missing_code} rows without a code in {label}");
    }
    if !missing_coordinates.is_empty() {
        log::warn!(
            "Skipped {} facilities without usable coordinates: {missing_coordinates:?}",
            missing_coordinates.len()
        );
    }
    if !duplicates.is_empty() {
        log::warn!(
            "Ignored {} repeated facility rows, keeping the first for codes {duplicates:?}",
            duplicates.len()
        );
    }

    log::info!("Loaded {} facilities from {label}", directory.len());

    Ok(directory)
}
