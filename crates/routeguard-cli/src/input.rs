// crates/routeguard-cli/src/input.rs
// ============================================================================
// Module: CLI Input Handling
// Description: Bounded file reads and evaluation-time parsing.
// Purpose: Keep untrusted inputs within size and encoding limits.
// Dependencies: routeguard-core, thiserror
// ============================================================================

//! ## Overview
//! Request files and golden suites are read through [`read_text_with_limit`],
//! which refuses oversized or non-UTF-8 input before any decoding happens.
//! [`parse_now`] accepts unix milliseconds or RFC 3339.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use routeguard_core::TimeError;
use routeguard_core::Timestamp;
use thiserror::Error;

use crate::t;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a request or model output file.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;
/// Maximum size of a golden suite file.
pub const MAX_SUITE_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug, Error)]
pub enum ReadLimitError {
    /// File I/O failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// File size exceeds the configured limit.
    #[error("file is {size} bytes (limit {limit})")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
    /// File content is not UTF-8.
    #[error("file is not utf-8")]
    NotUtf8,
}

impl ReadLimitError {
    /// Renders the error through the message catalog.
    #[must_use]
    pub fn localized(&self, kind: &str, path: &Path) -> String {
        match self {
            Self::Io(err) => {
                t!("input.read_failed", kind = kind, path = path.display(), error = err)
            }
            Self::TooLarge {
                size,
                limit,
            } => t!(
                "input.read_too_large",
                kind = kind,
                path = path.display(),
                size = size,
                limit = limit
            ),
            Self::NotUtf8 => t!("input.not_utf8", kind = kind, path = path.display()),
        }
    }
}

// ============================================================================
// SECTION: Reads
// ============================================================================

/// Reads a file while enforcing a hard size limit.
///
/// # Errors
///
/// Returns [`ReadLimitError`] on I/O failure or when the file exceeds
/// `max_bytes`.
pub fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a UTF-8 text file while enforcing a hard size limit.
///
/// # Errors
///
/// Returns [`ReadLimitError`] on I/O failure, oversize, or invalid UTF-8.
pub fn read_text_with_limit(path: &Path, max_bytes: usize) -> Result<String, ReadLimitError> {
    let bytes = read_bytes_with_limit(path, max_bytes)?;
    String::from_utf8(bytes).map_err(|_| ReadLimitError::NotUtf8)
}

// ============================================================================
// SECTION: Time
// ============================================================================

/// Parses an evaluation time given as unix milliseconds or RFC 3339.
///
/// # Errors
///
/// Returns [`TimeError`] when the value is neither.
pub fn parse_now(value: &str) -> Result<Timestamp, TimeError> {
    let value = value.trim();
    value
        .parse::<i64>()
        .map_or_else(|_| Timestamp::parse_rfc3339(value), |millis| Ok(Timestamp::UnixMillis(millis)))
}

/// Returns the current wall-clock time in unix milliseconds.
#[must_use]
pub fn wall_clock_now() -> Timestamp {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Timestamp::UnixMillis(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
