//! Sortable UTC timestamp formatting.
//!
//! All timestamps leave the pipeline as RFC 3339 strings in UTC with a `Z`
//! suffix and second precision, e.g. `2024-01-15T14:30:00Z`. Strings in this
//! form sort lexicographically in chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize as _, Deserializer, Serializer};

    /// Serializes `Some(ts)` as an RFC 3339 UTC string and `None` as null.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Parses an RFC 3339 string (any offset, normalized to UTC) or null.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn formats_with_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 5).unwrap();
        assert_eq!(format(&ts), "2023-09-01T00:00:05Z");
    }

    #[test]
    fn formatted_strings_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2023, 9, 30, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        assert!(format(&earlier) < format(&later));
    }
}
