//! Timestamp normalization.
//!
//! Takeout exports carry UTC timestamps such as `2024-01-01T00:00:00.123456Z`.
//! The output format is a civil time in the target zone with millisecond
//! precision: `2024/01/01 09:00:00.123`.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use thiserror::Error;

use crate::error::ChatmergeError;

/// Output format of normalized timestamps. `%.3f` truncates, never rounds.
pub const NORMALIZED_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Accepted layouts after RFC 3339 fails; `%.f` makes the fraction optional.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// A timestamp that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{input}': {reason}")]
pub struct TimestampError {
    pub input: String,
    pub reason: String,
}

/// Converts source timestamps into the target zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    tz: Tz,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { tz: Tz::Asia__Tokyo }
    }
}

impl Normalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a normalizer from an IANA zone name like `Asia/Tokyo`.
    pub fn from_zone_name(name: &str) -> Result<Self, ChatmergeError> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ChatmergeError::invalid_timezone(name))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Normalizes one raw timestamp.
    pub fn normalize(&self, raw: &str) -> Result<String, TimestampError> {
        normalize_timestamp(raw, self.tz)
    }
}

/// Parses an ISO-8601 timestamp with a `Z` suffix or numeric offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimestampError {
            input: raw.to_string(),
            reason: "empty value".to_string(),
        });
    }

    // `Z` means +00:00; the fallback layouts only understand numeric offsets
    let candidate = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    let rfc_err = match DateTime::parse_from_rfc3339(&candidate) {
        Ok(dt) => return Ok(dt),
        Err(e) => e,
    };

    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&candidate, fmt).ok())
        .ok_or_else(|| TimestampError {
            input: raw.to_string(),
            reason: rfc_err.to_string(),
        })
}

/// Converts `raw` to `tz` and formats it as `YYYY/MM/DD HH:MM:SS.mmm`.
///
/// # Example
///
/// ```rust
/// use chatmerge::parsing::normalize_timestamp;
///
/// let jst = normalize_timestamp("2024-01-01T00:00:00Z", chrono_tz::Asia::Tokyo).unwrap();
/// assert_eq!(jst, "2024/01/01 09:00:00.000");
/// ```
pub fn normalize_timestamp(raw: &str, tz: Tz) -> Result<String, TimestampError> {
    let parsed = parse_timestamp(raw)?;
    Ok(parsed.with_timezone(&tz).format(NORMALIZED_FORMAT).to_string())
}
