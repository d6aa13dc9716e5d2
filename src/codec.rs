//! Wire-format helpers for dates and datetimes.
//!
//! The service encodes dates as `YYYY-MM-DD` and datetimes in a compact
//! `YYYYMMDDTHH:MM:SS.ffffff` form. Inbound datetimes are ISO-like strings in
//! several variants, so parsing is lenient.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{AmsError, AmsResult};

/// Outbound datetime format.
pub const DATETIME_WIRE_FORMAT: &str = "%Y%m%dT%H:%M:%S%.6f";

/// Outbound date format.
pub const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

/// Format a date for the wire (`2023-01-05` → `"2023-01-05"`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_WIRE_FORMAT).to_string()
}

/// Format a datetime for the wire
/// (`2023-01-05T09:30:00.123456` → `"20230105T09:30:00.123456"`).
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_WIRE_FORMAT).to_string()
}

/// Parse an ISO-like datetime string.
///
/// Accepts the compact wire form, `T`- and space-separated ISO 8601, each with
/// or without fractional seconds, and tolerates a trailing `Z`.
pub fn parse_datetime(value: &str) -> AmsResult<NaiveDateTime> {
    let trimmed = value.trim_end_matches('Z');
    const FORMATS: [&str; 3] = [
        "%Y%m%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    Err(AmsError::Validation(format!(
        "unrecognized datetime string: {value:?}"
    )))
}

/// Serde `with`-module for datetime fields using the compact wire encoding.
pub mod compact_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_datetime(*datetime))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw).map_err(serde::de::Error::custom)
    }
}
