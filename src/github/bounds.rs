use crate::error::{Result, SentinelError};
use crate::github::Created;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// An inclusive ISO-8601 date bound
///
/// Keeps the caller's original text, which is what goes out on the wire and
/// into the report, alongside the parsed instant used for client-side filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBound {
    raw: String,
    instant: NaiveDateTime,
}

impl DateBound {
    /// Parse a bound, failing early on anything that is not an ISO-8601 timestamp
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let instant = parse_timestamp(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            instant,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    /// Date portion of the bound (everything before the time component)
    pub fn date_part(&self) -> &str {
        self.raw
            .split(|c| c == 'T' || c == ' ')
            .next()
            .unwrap_or(&self.raw)
    }
}

impl FromStr for DateBound {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse an ISO-8601 timestamp into a naive instant
///
/// A trailing `Z` is stripped first. Explicit offsets are normalized to UTC,
/// and a bare date means midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    let stripped = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(stripped, format) {
            return Ok(parsed);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(stripped, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }

    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.naive_utc())
        .map_err(|_| SentinelError::invalid_timestamp(value))
}

/// Keep only records created at or before `until`
///
/// Records whose own timestamp cannot be parsed are dropped with a warning.
pub fn retain_created_until<T: Created>(records: Vec<T>, until: &DateBound) -> Vec<T> {
    let bound = until.instant();
    records
        .into_iter()
        .filter(|record| match parse_timestamp(record.created_at()) {
            Ok(created) => created <= bound,
            Err(_) => {
                tracing::warn!(
                    "Dropping record with unparsable created_at: {}",
                    record.created_at()
                );
                false
            }
        })
        .collect()
}
