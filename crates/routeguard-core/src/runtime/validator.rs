// crates/routeguard-core/src/runtime/validator.rs
// ============================================================================
// Module: RouteGuard Update Validator
// Description: Form-Measure compensation checks for update events.
// Purpose: Reject tampered, inflated, unaudited, or silently overwriting updates.
// Dependencies: crate::core::{claim, cycle, hashing, policy, update}, thiserror
// ============================================================================

//! ## Overview
//! The validator enforces the Form-Measure compensation axiom: confidence
//! may not rise unless the rise is grounded and either paid for in
//! uncertainty or accompanied by a logged residual. Rules run in a fixed
//! order and the first failure is returned:
//!
//! 1. hash integrity of the pre- and post-state
//! 2. declared `uncertainty_delta` matches the measured change
//! 3. grounding of confidence changes
//! 4. audit trail coverage of `changed_fields`
//! 5. no unretracted deletions
//!
//! Success yields a [`ValidatedUpdate`] receipt. The validator never applies
//! the mutation; callers do that after an `ALLOW` decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimStatus;
use crate::core::cycle::Cycle;
use crate::core::hashing::HashDigest;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::ClaimId;
use crate::core::policy::GroundingPolicy;
use crate::core::update::AuditAction;
use crate::core::update::UpdateEvent;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted gap between declared and measured uncertainty change.
pub const UNCERTAINTY_DELTA_TOLERANCE: f64 = 1e-6;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Update validation failures.
///
/// # Invariants
/// - [`UpdateError::code`] names are stable and appear in violation details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// Declared hashes do not match the recomputed ones.
    #[error("HashMismatchError: {0}")]
    HashMismatch(String),
    /// Declared uncertainty change disagrees with the post-state.
    #[error("UncertaintyDeltaMismatchError: {0}")]
    UncertaintyDeltaMismatch(String),
    /// Confidence rose without grounding.
    #[error("ConfidenceInflationError: {0}")]
    ConfidenceInflation(String),
    /// Confidence and uncertainty both fell without grounding.
    #[error("MeasureCollapseError: {0}")]
    MeasureCollapse(String),
    /// `changed_fields` and the audit trail disagree.
    #[error("AuditTrailMismatchError: {0}")]
    AuditTrailMismatch(String),
    /// A field was deleted with no replacement and no retraction rationale.
    #[error("UnretractedDeletionError: field {0} deleted without replacement or retraction")]
    UnretractedDeletion(String),
    /// The post-state breaks a claim invariant.
    #[error("InvariantBrokenError: {0}")]
    InvariantBroken(String),
}

impl UpdateError {
    /// Returns the stable error name.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::HashMismatch(_) => "HashMismatchError",
            Self::UncertaintyDeltaMismatch(_) => "UncertaintyDeltaMismatchError",
            Self::ConfidenceInflation(_) => "ConfidenceInflationError",
            Self::MeasureCollapse(_) => "MeasureCollapseError",
            Self::AuditTrailMismatch(_) => "AuditTrailMismatchError",
            Self::UnretractedDeletion(_) => "UnretractedDeletionError",
            Self::InvariantBroken(_) => "InvariantBrokenError",
        }
    }
}

// ============================================================================
// SECTION: Receipt
// ============================================================================

/// Receipt for an update that passed every validator rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedUpdate {
    /// Claim the update applies to.
    pub claim_id: ClaimId,
    /// Verified post-state hash.
    pub after_state_hash: HashDigest,
    /// Confidence change (after minus before).
    pub confidence_delta: f64,
    /// Uncertainty change, declared and confirmed against the post-state.
    pub uncertainty_delta: f64,
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Rule 1: recomputes the pre- and post-state hashes.
///
/// # Errors
///
/// Returns [`UpdateError::HashMismatch`] on tampering or a stale view.
pub fn check_hash(event: &UpdateEvent, before: &ClaimRecord) -> Result<(), UpdateError> {
    if event.after_state.id != event.claim_id {
        return Err(UpdateError::HashMismatch(format!(
            "after_state id {} differs from claim_id {}",
            event.after_state.id, event.claim_id
        )));
    }
    let after = hash_canonical_json(event.after_state_hash.algorithm, &event.after_state)
        .map_err(|err| UpdateError::HashMismatch(err.to_string()))?;
    if after != event.after_state_hash {
        return Err(UpdateError::HashMismatch(
            "after_state_hash does not match the declared post-state".to_string(),
        ));
    }
    let prior = hash_canonical_json(event.before_state_hash.algorithm, before)
        .map_err(|err| UpdateError::HashMismatch(err.to_string()))?;
    if prior != event.before_state_hash {
        return Err(UpdateError::HashMismatch(
            "before_state_hash does not match the current claim (stale view)".to_string(),
        ));
    }
    Ok(())
}

/// Returns the uncertainty change between `before` and the post-state.
#[must_use]
pub fn measured_uncertainty_delta(event: &UpdateEvent, before: &ClaimRecord) -> f64 {
    event.after_state.uncertainty - before.uncertainty
}

/// Rule 2: the declared uncertainty change must match the post-state.
///
/// # Errors
///
/// Returns [`UpdateError::UncertaintyDeltaMismatch`] when `uncertainty_delta`
/// differs from the measured change by more than
/// [`UNCERTAINTY_DELTA_TOLERANCE`].
pub fn check_uncertainty_delta(
    event: &UpdateEvent,
    before: &ClaimRecord,
) -> Result<(), UpdateError> {
    let measured = measured_uncertainty_delta(event, before);
    if (event.uncertainty_delta - measured).abs() <= UNCERTAINTY_DELTA_TOLERANCE {
        return Ok(());
    }
    Err(UpdateError::UncertaintyDeltaMismatch(format!(
        "declared uncertainty_delta {:.4} but uncertainty moved {:.4} -> {:.4}",
        event.uncertainty_delta, before.uncertainty, event.after_state.uncertainty
    )))
}

/// Rule 3: confidence changes must be grounded.
///
/// # Errors
///
/// Returns [`UpdateError::ConfidenceInflation`] when confidence rose beyond
/// the policy threshold without a justification and either a non-positive
/// `uncertainty_delta` or a residual in the same cycle. Returns
/// [`UpdateError::MeasureCollapse`] when confidence and uncertainty both fell
/// without a justification. Callers run [`check_uncertainty_delta`] first.
pub fn check_grounding(
    event: &UpdateEvent,
    before: &ClaimRecord,
    cycle: &Cycle,
    policy: &GroundingPolicy,
) -> Result<(), UpdateError> {
    let after = &event.after_state;
    let rise = after.confidence - before.confidence;
    let justified = event.justification.trim().chars().count() >= policy.min_justification_chars;
    if rise > policy.confidence_rise_threshold {
        if !justified {
            return Err(UpdateError::ConfidenceInflation(format!(
                "confidence rose {:.4} -> {:.4} without justification",
                before.confidence, after.confidence
            )));
        }
        let paid = event.uncertainty_delta <= 0.0 || cycle.has_residual_for(&event.claim_id);
        if !paid {
            return Err(UpdateError::ConfidenceInflation(format!(
                "confidence rose with uncertainty_delta {:.4} and no residual logged",
                event.uncertainty_delta
            )));
        }
    } else if rise < 0.0 && after.uncertainty < before.uncertainty && !justified {
        return Err(UpdateError::MeasureCollapse(
            "confidence and uncertainty both decreased without justification".to_string(),
        ));
    }
    Ok(())
}

/// Rule 4: `changed_fields` must equal the audited field set.
///
/// # Errors
///
/// Returns [`UpdateError::AuditTrailMismatch`] listing the asymmetric fields.
pub fn check_audit_trail(event: &UpdateEvent) -> Result<(), UpdateError> {
    let changed: BTreeSet<&str> = event.changed_fields.iter().map(String::as_str).collect();
    let audited = event.audited_fields();
    if changed == audited {
        return Ok(());
    }
    let unaudited: Vec<&str> = changed.difference(&audited).copied().collect();
    let undeclared: Vec<&str> = audited.difference(&changed).copied().collect();
    Err(UpdateError::AuditTrailMismatch(format!(
        "unaudited [{}], undeclared [{}]",
        unaudited.join(", "),
        undeclared.join(", ")
    )))
}

/// Rule 5: deletions need a replacement or a retraction with rationale.
///
/// # Errors
///
/// Returns [`UpdateError::UnretractedDeletion`] for the first silent delete.
pub fn check_deletions(event: &UpdateEvent) -> Result<(), UpdateError> {
    let retracted: BTreeSet<&str> = event
        .audit_trail
        .iter()
        .filter(|entry| entry.action == AuditAction::Retract && entry.has_rationale())
        .map(|entry| entry.field.as_str())
        .collect();
    let silent = event.audit_trail.iter().find(|entry| {
        entry.action == AuditAction::Delete
            && !entry.has_replacement()
            && !retracted.contains(entry.field.as_str())
    });
    match silent {
        Some(entry) => Err(UpdateError::UnretractedDeletion(entry.field.clone())),
        None => Ok(()),
    }
}

/// Runs rules 1 through 5 in order.
///
/// # Errors
///
/// Returns the first [`UpdateError`] raised.
pub fn validate_update(
    event: &UpdateEvent,
    before: &ClaimRecord,
    cycle: &Cycle,
    policy: &GroundingPolicy,
) -> Result<ValidatedUpdate, UpdateError> {
    check_hash(event, before)?;
    check_uncertainty_delta(event, before)?;
    check_grounding(event, before, cycle, policy)?;
    check_audit_trail(event)?;
    check_deletions(event)?;
    Ok(ValidatedUpdate {
        claim_id: event.claim_id.clone(),
        after_state_hash: event.after_state_hash.clone(),
        confidence_delta: event.after_state.confidence - before.confidence,
        uncertainty_delta: event.uncertainty_delta,
    })
}

// ============================================================================
// SECTION: Invariant Re-check
// ============================================================================

/// Independently re-checks claim invariants across an update.
///
/// Identity fields are immutable, evidence lists are append-only, the status
/// move must be permitted, and taint only clears on anchoring.
///
/// # Errors
///
/// Returns [`UpdateError::InvariantBroken`] naming the first broken invariant.
pub fn recheck_invariants(before: &ClaimRecord, after: &ClaimRecord) -> Result<(), UpdateError> {
    let broken = |detail: &str| Err(UpdateError::InvariantBroken(detail.to_string()));
    if before.id != after.id || before.source != after.source || before.kind != after.kind {
        return broken("claim identity fields changed");
    }
    if before.timestamp != after.timestamp {
        return broken("claim creation timestamp changed");
    }
    if !after.support.starts_with(&before.support) {
        return broken("support evidence was rewritten");
    }
    if !after.counter_support.starts_with(&before.counter_support) {
        return broken("counter_support evidence was rewritten");
    }
    if !before.status.permits(after.status) {
        return Err(UpdateError::InvariantBroken(format!(
            "status {} cannot move to {}",
            before.status, after.status
        )));
    }
    if before.tainted && !after.tainted && after.status != ClaimStatus::Anchored {
        return broken("taint cleared without anchoring");
    }
    Ok(())
}
