// crates/routeguard-core/src/core/time.rs
// ============================================================================
// Module: RouteGuard Time Model
// Description: Canonical timestamp representations for claims and decisions.
// Purpose: Provide deterministic, replayable time values for decay and audit.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! RouteGuard uses explicit time values embedded in claims and supplied to
//! every evaluation call to keep replay deterministic. The core engine never
//! reads wall-clock time directly; hosts must supply `now`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Milliseconds per second, used when converting unix millis to seconds.
const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: i128 = 1_000_000;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in claims, reinforcement events, and decisions.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Logical ticks are interpreted as seconds when computing elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }

    /// Returns the seconds elapsed since `earlier`, clamped at zero.
    ///
    /// Returns `None` when the two timestamps are of different kinds.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Elapsed time is a real-valued decay input.")]
    pub fn seconds_since(&self, earlier: &Self) -> Option<f64> {
        match (self, earlier) {
            (Self::UnixMillis(now), Self::UnixMillis(then)) => {
                let delta = now.saturating_sub(*then).max(0);
                Some(delta as f64 / MILLIS_PER_SECOND)
            }
            (Self::Logical(now), Self::Logical(then)) => Some(now.saturating_sub(*then) as f64),
            _ => None,
        }
    }

    /// Parses an RFC 3339 timestamp into unix milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] when the input is not valid RFC 3339 or does not
    /// fit into signed 64-bit milliseconds.
    pub fn parse_rfc3339(input: &str) -> Result<Self, TimeError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339)
            .map_err(|err| TimeError::Parse(err.to_string()))?;
        let millis = parsed.unix_timestamp_nanos() / NANOS_PER_MILLI;
        let millis = i64::try_from(millis).map_err(|_| TimeError::OutOfRange)?;
        Ok(Self::UnixMillis(millis))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// Input could not be parsed as RFC 3339.
    #[error("invalid rfc3339 timestamp: {0}")]
    Parse(String),
    /// Parsed value does not fit into unix milliseconds.
    #[error("timestamp out of range")]
    OutOfRange,
}
