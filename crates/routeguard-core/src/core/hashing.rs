// crates/routeguard-core/src/core/hashing.rs
// ============================================================================
// Module: RouteGuard State Hashing
// Description: Content digests of claims and requests over JCS-canonical JSON.
// Purpose: Let the validator recompute update hashes independently.
// Dependencies: serde, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! A claim's state hash is SHA-256 over its RFC 8785 (JCS) encoding, written
//! as lowercase hex. Field order and whitespace never change a digest, so an
//! integrator and the validator agree on the hash of the same claim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Digests
// ============================================================================

/// Digest algorithm named in every [`HashDigest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Hex characters in a digest of this algorithm.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
        }
    }
}

/// Algorithm used for state hashes.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// Algorithm-tagged hex digest carried by update events and decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Algorithm that produced `value`.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

impl HashDigest {
    /// True when `value` is lowercase hex of the algorithm's length.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.value.len() == self.algorithm.hex_len()
            && self.value.bytes().all(|byte| matches!(byte, b'0' ..= b'9' | b'a' ..= b'f'))
    }
}

/// Canonicalization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The value could not be encoded as canonical JSON.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing
// ============================================================================

/// Digests the JCS encoding of `value`.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when `value` does not serialize,
/// for example a non-finite float.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, HashError> {
    let canonical =
        serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))?;
    let bytes = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(&canonical),
    };
    let value = bytes.iter().fold(String::with_capacity(algorithm.hex_len()), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    });
    Ok(HashDigest {
        algorithm,
        value,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
