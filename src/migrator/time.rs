//! Timestamp decoding for export documents.
//!
//! Exports carry timestamps in a handful of fixed shapes rather than strict
//! RFC 3339. Every layout is read as UTC; the trailing `Z` of the ISO-style
//! layouts is matched literally, not parsed as an offset.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Layouts tried in order; the first one that parses wins.
pub const TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.3f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.3fZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

/// Parse an export timestamp into a UTC instant.
///
/// Surrounding double quotes are stripped first, so a raw JSON string token
/// is accepted as well as its contents.
///
/// # Errors
///
/// Returns [`Error::TimeParse`] naming the input if no layout matches.
pub fn parse_export_time(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim_matches('"');
    let parsed = if has_fixed_shape(value) {
        TIME_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
    } else {
        None
    };
    parsed
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::TimeParse {
            value: value.to_string(),
        })
}

/// Zero-padded `YYYY-MM-DD?HH:MM:SS` prefix with no surrounding whitespace.
///
/// chrono's numeric specifiers accept unpadded fields and its space item
/// skips any run of whitespace, so the fixed columns are checked up front.
fn has_fixed_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 19 || bytes[bytes.len() - 1].is_ascii_whitespace() {
        return false;
    }
    bytes[..19].iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ' || b == b'T',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// A timestamp field of an export record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTime(pub DateTime<Utc>);

impl ExportTime {
    #[must_use]
    pub const fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl<'de> Deserialize<'de> for ExportTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_export_time(&raw)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
