//! Pipeline settings.
//!
//! Defaults are embedded from `config/default.toml` at compile time. A user
//! file is merged over them key by key, so it only needs the settings it
//! changes.

use std::path::Path;

use journey_map_geography::RegionSpec;
use serde::Deserialize;

use crate::GenerateError;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Individuals written to `highlights.json`.
    pub highlight_count: usize,
    /// Facilities outside the region featured in `statistics.json`.
    pub featured_facility_count: usize,
    /// Destinations and origins listed per featured location.
    pub neighbor_count: usize,
    /// Upper bound of the scaled flow weight.
    pub max_scaled_count: u32,
    /// Camera zoom for featured facilities.
    pub facility_zoom: f64,
    /// The featured region.
    pub region: RegionConfig,
    /// Timeline options.
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// The featured region cluster and its camera zoom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    /// Display name.
    pub name: String,
    /// Reference latitude.
    pub latitude: f64,
    /// Reference longitude.
    pub longitude: f64,
    /// Inclusive membership radius in kilometers.
    pub radius_km: f64,
    /// Camera zoom for the region.
    pub zoom: f64,
}

impl RegionConfig {
    /// The cluster definition for this region.
    #[must_use]
    pub fn spec(&self) -> RegionSpec {
        RegionSpec {
            name: self.name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            radius_km: self.radius_km,
        }
    }
}

/// Timeline options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineConfig {
    /// First month (`YYYY-MM`) to include.
    pub start_month: Option<String>,
}

impl PipelineConfig {
    /// The embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the embedded file fails to parse or
    /// validate.
    pub fn embedded() -> Result<Self, GenerateError> {
        Self::from_overrides("")
    }

    /// Loads the defaults, merged with the TOML file at `path` if given.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the file cannot be read, is not valid
    /// TOML, has unknown keys, or holds out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, GenerateError> {
        let Some(path) = path else {
            return Self::embedded();
        };

        log::info!("Loading config overrides from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| GenerateError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_overrides(&contents)
    }

    /// Parses `overrides` as TOML and merges it over the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if either document is not valid TOML, the
    /// merged result has unknown or missing keys, or a value is out of range.
    pub fn from_overrides(overrides: &str) -> Result<Self, GenerateError> {
        let mut merged: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
        merge(&mut merged, toml::from_str(overrides)?);

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GenerateError> {
        let region = &self.region;

        if self.max_scaled_count == 0 {
            return Err(invalid("max_scaled_count must be at least 1"));
        }
        if !(-90.0..=90.0).contains(&region.latitude)
            || !(-180.0..=180.0).contains(&region.longitude)
        {
            return Err(invalid(format!(
                "region coordinate ({}, {}) is out of range",
                region.latitude, region.longitude
            )));
        }
        if !region.radius_km.is_finite() || region.radius_km < 0.0 {
            return Err(invalid(format!(
                "region radius_km must be a non-negative number, got {}",
                region.radius_km
            )));
        }
        if let Some(month) = &self.timeline.start_month
            && !is_year_month(month)
        {
            return Err(invalid(format!(
                "timeline start_month must look like YYYY-MM, got '{month}'"
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> GenerateError {
    GenerateError::Config {
        message: message.into(),
    }
}

/// Recursively overlays `overrides` onto `base`. Nested tables merge; any
/// other value replaces what was there.
fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

fn is_year_month(s: &str) -> bool {
    let Some((year, month)) = s.split_once('-') else {
        return false;
    };
    year.len() == 4
        && month.len() == 2
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
}
