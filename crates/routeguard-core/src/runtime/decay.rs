// crates/routeguard-core/src/runtime/decay.rs
// ============================================================================
// Module: RouteGuard Decay Engine
// Description: Time-based confidence decay for claims.
// Purpose: Compute effective confidence/uncertainty and a lifecycle recommendation.
// Dependencies: crate::core::{claim, policy, time}, thiserror
// ============================================================================

//! ## Overview
//! Decay is a pure function of `(claim, now, policy)`. It never mutates the
//! claim and never reads storage or the wall clock, so repeated calls with
//! the same inputs return the same [`DecayResult`].
//!
//! The decay period `T` is resolved with this precedence:
//! `ttl_seconds`, then `decay_rate` (`T = ln 2 / rate`), then `ttl_class`,
//! then the policy default class. The exponential model treats `T` as a
//! half-life; the linear model treats it as the full lifetime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::f64::consts::LN_2;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimStatus;
use crate::core::identifiers::ClaimId;
use crate::core::policy::DecayModel;
use crate::core::policy::DecayPolicy;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Lifecycle recommendation derived from decayed confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayAction {
    /// Keep the current status.
    Retain,
    /// Demote a canonical claim back to provisional.
    Demote,
    /// Transition the claim to expired.
    Expire,
}

/// Result of decaying one claim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayResult {
    /// Confidence after decay.
    pub effective_confidence: f64,
    /// Initial uncertainty plus the confidence lost, capped at 1.
    pub effective_uncertainty: f64,
    /// Seconds since the decay clock started.
    pub elapsed_seconds: f64,
    /// Resolved decay period in seconds.
    pub period_seconds: f64,
    /// Recommended lifecycle action.
    pub action: DecayAction,
}

/// Decay computation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecayError {
    /// `now` and the claim clock use different timestamp kinds.
    #[error("IncomparableTimestamps: claim {0} and evaluation time use different clocks")]
    IncomparableTimestamps(ClaimId),
    /// A claim decay parameter is not a positive finite number.
    #[error("claim {claim_id} has invalid {field}")]
    InvalidParameter {
        /// Claim carrying the parameter.
        claim_id: ClaimId,
        /// Offending field name.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Decay
// ============================================================================

/// Resolves the decay period for `claim`.
///
/// # Errors
///
/// Returns [`DecayError::InvalidParameter`] when `ttl_seconds` or `decay_rate`
/// is zero, negative, or not finite.
pub fn decay_period(claim: &ClaimRecord, policy: &DecayPolicy) -> Result<f64, DecayError> {
    let invalid = |field| DecayError::InvalidParameter {
        claim_id: claim.id.clone(),
        field,
    };
    if let Some(ttl) = claim.ttl_seconds {
        return if is_positive(ttl) { Ok(ttl) } else { Err(invalid("ttl_seconds")) };
    }
    if let Some(rate) = claim.decay_rate {
        return if is_positive(rate) { Ok(LN_2 / rate) } else { Err(invalid("decay_rate")) };
    }
    let class = claim.ttl_class.unwrap_or(policy.default_class);
    Ok(policy.half_lives.for_class(class))
}

/// Computes the effective confidence of `claim` at `now`.
///
/// A `now` earlier than the decay clock start counts as zero elapsed time.
///
/// # Errors
///
/// Returns [`DecayError`] when the timestamps are of different kinds or a
/// decay parameter is invalid.
pub fn decay(
    claim: &ClaimRecord,
    now: Timestamp,
    policy: &DecayPolicy,
) -> Result<DecayResult, DecayError> {
    let elapsed = now
        .seconds_since(&claim.decay_clock_start())
        .ok_or_else(|| DecayError::IncomparableTimestamps(claim.id.clone()))?;
    let period = decay_period(claim, policy)?;
    let factor = match policy.model {
        DecayModel::Exponential => (-LN_2 * elapsed / period).exp(),
        DecayModel::Linear => (1.0 - elapsed / period).max(0.0),
    };
    let effective_confidence = claim.confidence * factor;
    let lost = claim.confidence - effective_confidence;
    let effective_uncertainty = (claim.uncertainty + lost).min(1.0);
    Ok(DecayResult {
        effective_confidence,
        effective_uncertainty,
        elapsed_seconds: elapsed,
        period_seconds: period,
        action: recommend(claim.status, effective_confidence, policy),
    })
}

/// Maps decayed confidence to a lifecycle recommendation.
fn recommend(status: ClaimStatus, confidence: f64, policy: &DecayPolicy) -> DecayAction {
    match status {
        ClaimStatus::Expired => DecayAction::Retain,
        ClaimStatus::Canonical if confidence < policy.canonical_floor => DecayAction::Demote,
        ClaimStatus::Canonical => DecayAction::Retain,
        _ if confidence < policy.expiry_floor => DecayAction::Expire,
        _ => DecayAction::Retain,
    }
}

/// Returns true for positive finite values.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
