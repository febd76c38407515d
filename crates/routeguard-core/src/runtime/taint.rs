// crates/routeguard-core/src/runtime/taint.rs
// ============================================================================
// Module: RouteGuard Taint Tracker
// Description: Monotonic propagation of untrusted-input taint.
// Purpose: Force stricter gating whenever a request rests on untrusted input.
// Dependencies: crate::core::{claim, cycle, decision, identifiers}
// ============================================================================

//! ## Overview
//! Taint is a one-way flag. A tracker starts clean and can only be marked;
//! there is no operation that clears it. Claims derived under a tainted
//! tracker inherit `tainted = true` unless an anchor entry in the cycle lists
//! them explicitly. Absence of evidence is never treated as evidence of trust.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimSource;
use crate::core::cycle::Cycle;
use crate::core::decision::DecisionRequest;
use crate::core::decision::SourceTrust;
use crate::core::identifiers::ClaimId;

// ============================================================================
// SECTION: Reasons
// ============================================================================

/// Why a request became tainted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaintReason {
    /// Caller set `tainted_context`.
    ContextFlag,
    /// Input source untrusted or external and not anchored.
    UntrustedInput(String),
    /// Claim already carried taint.
    TaintedClaim(ClaimId),
    /// External claim not yet anchored or canonical.
    UnanchoredExternalClaim(ClaimId),
}

impl TaintReason {
    /// Returns a short description for gate details.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ContextFlag => "tainted_context flag set".to_string(),
            Self::UntrustedInput(reference) => format!("untrusted input {reference}"),
            Self::TaintedClaim(id) => format!("claim {id} is tainted"),
            Self::UnanchoredExternalClaim(id) => format!("external claim {id} is not anchored"),
        }
    }
}

// ============================================================================
// SECTION: Tracker
// ============================================================================

/// Monotonic taint flag with the reasons that set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaintTracker {
    /// Reasons recorded in observation order.
    reasons: Vec<TaintReason>,
}

impl TaintTracker {
    /// Creates a clean tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reasons: Vec::new(),
        }
    }

    /// Builds a tracker from every taint source in `request`.
    #[must_use]
    pub fn observe(request: &DecisionRequest) -> Self {
        let mut tracker = Self::new();
        if request.context.tainted_context {
            tracker.mark(TaintReason::ContextFlag);
        }
        for source in &request.context.input_sources {
            if source.trust != SourceTrust::Trusted && !source.anchored {
                tracker.mark(TaintReason::UntrustedInput(source.reference.clone()));
            }
        }
        for claim in &request.claims {
            if claim.tainted {
                tracker.mark(TaintReason::TaintedClaim(claim.id.clone()));
            } else if claim.source == ClaimSource::External && !claim.is_anchored() {
                tracker.mark(TaintReason::UnanchoredExternalClaim(claim.id.clone()));
            }
        }
        tracker
    }

    /// Records a taint reason; the tracker stays tainted afterwards.
    pub fn mark(&mut self, reason: TaintReason) {
        self.reasons.push(reason);
    }

    /// Returns true once any reason has been recorded.
    #[must_use]
    pub fn is_tainted(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Returns the recorded reasons.
    #[must_use]
    pub fn reasons(&self) -> &[TaintReason] {
        &self.reasons
    }

    /// Returns `claim` as derived within the current cycle.
    ///
    /// The result is tainted when the claim or the tracker is tainted, unless
    /// an anchor entry in `cycle` lists the claim.
    #[must_use]
    pub fn derive(&self, claim: &ClaimRecord, cycle: &Cycle) -> ClaimRecord {
        let mut derived = claim.clone();
        let anchored = cycle.anchored_claims().contains(&claim.id);
        derived.tainted = (claim.tainted || self.is_tainted()) && !anchored;
        derived
    }

    /// Returns claims in `claims` that stay tainted after derivation.
    #[must_use]
    pub fn unresolved<'a>(&self, claims: &'a [ClaimRecord], cycle: &Cycle) -> BTreeSet<&'a ClaimId> {
        claims
            .iter()
            .filter(|claim| self.derive(claim, cycle).tainted)
            .map(|claim| &claim.id)
            .collect()
    }
}
