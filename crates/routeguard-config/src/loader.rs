// crates/routeguard-config/src/loader.rs
// ============================================================================
// Module: Policy Loader
// Description: Bounded, fail-closed policy file loading.
// Purpose: Resolve, read, decode, and validate policy documents.
// Dependencies: routeguard-core, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! [`load_policy`] resolves the policy path (argument, then the
//! `ROUTEGUARD_POLICY` environment variable, then `routeguard-policy.json`),
//! checks path and size limits, reads at most one byte past the size limit,
//! requires UTF-8, decodes by extension, and validates the result. [`parse_policy`] performs the decode and validate
//! steps on in-memory text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use routeguard_core::Policy;
use routeguard_core::ValidatedPolicy;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default policy file name.
pub const DEFAULT_POLICY_NAME: &str = "routeguard-policy.json";
/// Environment variable naming the policy path.
pub const POLICY_ENV_VAR: &str = "ROUTEGUARD_POLICY";
/// Maximum policy file size in bytes.
pub const MAX_POLICY_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the policy file failed.
    #[error("policy io error: {0}")]
    Io(String),
    /// The policy document could not be decoded.
    #[error("policy parse error: {0}")]
    Parse(String),
    /// The policy document decoded but is invalid.
    #[error("invalid policy: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Encoding of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

impl PolicyFormat {
    /// Chooses the format from the file extension; anything but `.toml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and validates the policy at `path`, or at the resolved default.
///
/// # Errors
///
/// Returns [`ConfigError`] when the path violates limits, the file cannot be
/// read, exceeds [`MAX_POLICY_FILE_SIZE`], is not UTF-8, fails to decode, or
/// fails policy validation.
pub fn load_policy(path: Option<&Path>) -> Result<ValidatedPolicy, ConfigError> {
    let resolved = resolve_policy_path(path)?;
    let bytes = match read_bounded(&resolved, MAX_POLICY_FILE_SIZE)
        .map_err(|err| ConfigError::Io(err.to_string()))?
    {
        BoundedRead::Complete(bytes) => bytes,
        BoundedRead::TooLarge => {
            return Err(ConfigError::Invalid("policy file exceeds size limit".to_string()));
        }
    };
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("policy file must be utf-8".to_string()))?;
    parse_policy(content, PolicyFormat::from_path(&resolved))
}

/// Resolves the policy path [`load_policy`] would read and checks its limits.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the path exceeds length limits.
pub fn resolve_policy_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let resolved = resolve_path(path)?;
    validate_path(&resolved)?;
    Ok(resolved)
}

/// Decodes `content` as `format` and validates it.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on decode failure and
/// [`ConfigError::Invalid`] when validation rejects the policy.
pub fn parse_policy(content: &str, format: PolicyFormat) -> Result<ValidatedPolicy, ConfigError> {
    let policy: Policy = match format {
        PolicyFormat::Json => {
            serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?
        }
        PolicyFormat::Toml => {
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?
        }
    };
    policy.validate().map_err(|err| ConfigError::Invalid(err.to_string()))
}

// ============================================================================
// SECTION: Path Handling
// ============================================================================

/// Resolves the policy path from the argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(POLICY_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("policy path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_POLICY_NAME))
}

/// Enforces total length and per-component limits on `path`.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.to_string_lossy();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("policy path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("policy path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Outcome of a size-limited read.
pub(crate) enum BoundedRead {
    /// Whole file, within the limit.
    Complete(Vec<u8>),
    /// File is larger than the limit.
    TooLarge,
}

/// Reads at most `limit + 1` bytes of `path`.
pub(crate) fn read_bounded(path: &Path, limit: usize) -> io::Result<BoundedRead> {
    let file = File::open(path)?;
    let cap = u64::try_from(limit).unwrap_or(u64::MAX);
    if file.metadata()?.len() > cap {
        return Ok(BoundedRead::TooLarge);
    }
    let mut bytes = Vec::new();
    file.take(cap.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Ok(BoundedRead::TooLarge);
    }
    Ok(BoundedRead::Complete(bytes))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
