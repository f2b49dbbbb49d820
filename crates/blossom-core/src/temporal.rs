//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` is the only time type written to the ledger: license
//! onboarding dates and checked-out key expirations. It is UTC with a `Z`
//! suffix and truncated to seconds, so two peers serializing the same record
//! produce the same bytes.
//!
//! Non-UTC inputs are rejected by [`Timestamp::parse()`]; there is no silent
//! offset conversion on the strict path.

use chrono::{DateTime, Months, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BlossomError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::parse()`] — from an RFC 3339 string with a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, including `+00:00`,
    /// are rejected.
    pub fn parse(s: &str) -> Result<Self, BlossomError> {
        if !s.ends_with('Z') {
            return Err(BlossomError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            BlossomError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// The instant `years` calendar years after this one.
    ///
    /// A Feb 29 start clamps to Feb 28 in non-leap target years.
    pub fn plus_years(&self, years: u32) -> Result<Self, BlossomError> {
        let months = years.checked_mul(12).ok_or_else(|| {
            BlossomError::Validation(format!("year offset {years} overflows"))
        })?;
        self.0
            .checked_add_months(Months::new(months))
            .map(Self)
            .ok_or_else(|| {
                BlossomError::Validation(format!("{self} plus {years} years is out of range"))
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
