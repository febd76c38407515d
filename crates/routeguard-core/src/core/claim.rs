// crates/routeguard-core/src/core/claim.rs
// ============================================================================
// Module: RouteGuard Claim Model
// Description: Provenance-tagged, decaying memory claims and their lifecycle.
// Purpose: Provide the claim record and pure lifecycle transition functions.
// Dependencies: crate::core::{identifiers, time}, serde, thiserror
// ============================================================================

//! ## Overview
//! A claim is a belief item with provenance, a confidence/uncertainty pair,
//! and decay/TTL state. Every lifecycle operation returns a new record; the
//! input record is never mutated, so callers decide when to persist a change.
//!
//! ## Lifecycle
//! `PROVISIONAL -> CHALLENGED -> ANCHORED -> CANONICAL`, with `QUARANTINED`
//! for tainted writes and `EXPIRED` once decay crosses the policy floor.
//! `CANONICAL` only leaves through decay-driven demotion to `PROVISIONAL`;
//! `EXPIRED` is terminal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ClaimId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Claim Enumerations
// ============================================================================

/// Origin of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSource {
    /// Produced by the agent about itself.
    #[serde(rename = "self")]
    SelfReport,
    /// Produced by another agent in the cycle.
    Agent,
    /// Ingested from an external source.
    External,
}

/// Semantic category of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// Ordinary factual assertion.
    #[default]
    Assertion,
    /// Claim about the identity of an agent, person, or system.
    Identity,
}

/// Discrete risk tier controlling the decay half-life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TtlClass {
    /// Low risk, longest half-life.
    Low,
    /// Medium risk.
    Medium,
    /// High risk, shortest half-life.
    High,
}

/// Claim lifecycle status.
///
/// # Invariants
/// - Variants are stable for serialization and audit matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Created by a proposer, not yet challenged or grounded.
    Provisional,
    /// A challenger entry exists for the claim.
    Challenged,
    /// External grounding has been confirmed.
    Anchored,
    /// Promoted after surviving the full cycle.
    Canonical,
    /// Written under a tainted context and awaiting verification.
    Quarantined,
    /// Decayed confidence fell below the policy floor.
    Expired,
}

impl ClaimStatus {
    /// Returns the stable wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisional => "PROVISIONAL",
            Self::Challenged => "CHALLENGED",
            Self::Anchored => "ANCHORED",
            Self::Canonical => "CANONICAL",
            Self::Quarantined => "QUARANTINED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns true when an update may move a claim from `self` to `to`.
    ///
    /// Staying in the same status is always permitted except for `EXPIRED`,
    /// which admits no further updates.
    #[must_use]
    pub fn permits(self, to: Self) -> bool {
        match (self, to) {
            (Self::Expired, _) => false,
            (Self::Provisional, Self::Challenged)
            | (Self::Provisional | Self::Challenged | Self::Quarantined, Self::Anchored)
            | (Self::Anchored, Self::Canonical)
            | (Self::Provisional | Self::Challenged | Self::Anchored, Self::Quarantined)
            | (
                Self::Provisional | Self::Challenged | Self::Anchored | Self::Quarantined,
                Self::Expired,
            )
            | (Self::Canonical, Self::Provisional) => true,
            (from, to) => from == to,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Evidence References
// ============================================================================

/// Reference to a piece of supporting or counter evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// Opaque reference to the evidence (URI, content hash, record id).
    pub reference: String,
    /// Where the evidence came from; required for reinforcement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl EvidenceRef {
    /// Creates an evidence reference with provenance.
    #[must_use]
    pub fn new(reference: impl Into<String>, provenance: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            provenance: Some(provenance.into()),
        }
    }

    /// Returns true when the reference and its provenance are both non-blank.
    #[must_use]
    pub fn has_provenance(&self) -> bool {
        !self.reference.trim().is_empty()
            && self.provenance.as_deref().is_some_and(|value| !value.trim().is_empty())
    }
}

// ============================================================================
// SECTION: Claim Record
// ============================================================================

/// Provenance-tagged, decaying belief item.
///
/// # Invariants
/// - `confidence` and `uncertainty` lie in `[0, 1]` (checked by gate 1).
/// - When both `ttl_seconds` and `ttl_class`/`decay_rate` are set, `ttl_seconds` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Claim identifier.
    pub id: ClaimId,
    /// Origin of the claim.
    pub source: ClaimSource,
    /// Semantic category.
    #[serde(default)]
    pub kind: ClaimKind,
    /// Creation time.
    pub timestamp: Timestamp,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Uncertainty in `[0, 1]`.
    pub uncertainty: f64,
    /// Risk tier selecting the policy half-life.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_class: Option<TtlClass>,
    /// Explicit decay rate per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_rate: Option<f64>,
    /// Explicit numeric TTL in seconds; overrides class and rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<f64>,
    /// Ordered supporting evidence.
    #[serde(default)]
    pub support: Vec<EvidenceRef>,
    /// Ordered counter evidence.
    #[serde(default)]
    pub counter_support: Vec<EvidenceRef>,
    /// Lifecycle status.
    pub status: ClaimStatus,
    /// Whether the claim was derived from an untrusted context.
    #[serde(default)]
    pub tainted: bool,
    /// Last reinforcement that reset the decay clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reinforced_at: Option<Timestamp>,
}

impl ClaimRecord {
    /// Creates a new provisional claim as a proposer step would.
    #[must_use]
    pub fn provisional(
        id: impl Into<ClaimId>,
        source: ClaimSource,
        timestamp: Timestamp,
        confidence: f64,
        uncertainty: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            kind: ClaimKind::Assertion,
            timestamp,
            confidence,
            uncertainty,
            ttl_class: None,
            decay_rate: None,
            ttl_seconds: None,
            support: Vec::new(),
            counter_support: Vec::new(),
            status: ClaimStatus::Provisional,
            tainted: false,
            last_reinforced_at: None,
        }
    }

    /// Returns the time the decay clock started.
    #[must_use]
    pub fn decay_clock_start(&self) -> Timestamp {
        self.last_reinforced_at.unwrap_or(self.timestamp)
    }

    /// Returns true when at least one supporting reference carries provenance.
    #[must_use]
    pub fn has_provenance(&self) -> bool {
        self.support.iter().any(EvidenceRef::has_provenance)
    }

    /// Returns true when the claim has been externally grounded.
    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        matches!(self.status, ClaimStatus::Anchored | ClaimStatus::Canonical)
    }

    /// Extends `support` with new evidence, optionally resetting the decay clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidEvidence`] when the evidence lacks provenance,
    /// or [`ClaimError::InvalidTransition`] when the claim has expired.
    pub fn apply_reinforcement(&self, reinforcement: &Reinforcement) -> Result<Self, ClaimError> {
        if !reinforcement.evidence.has_provenance() {
            return Err(ClaimError::InvalidEvidence(reinforcement.evidence.reference.clone()));
        }
        if self.status == ClaimStatus::Expired {
            return Err(ClaimError::InvalidTransition {
                from: self.status,
                transition: "reinforce",
            });
        }
        let mut next = self.clone();
        next.support.push(reinforcement.evidence.clone());
        if reinforcement.resets_clock {
            next.last_reinforced_at = Some(reinforcement.observed_at);
        }
        Ok(next)
    }

    /// Applies a lifecycle transition and returns the resulting claim.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError`] when the transition is not permitted from the
    /// current status or canonical prerequisites are not met.
    pub fn transition(&self, transition: ClaimTransition) -> Result<Self, ClaimError> {
        use ClaimStatus::Anchored;
        use ClaimStatus::Canonical;
        use ClaimStatus::Challenged;
        use ClaimStatus::Provisional;
        use ClaimStatus::Quarantined;

        let invalid = || ClaimError::InvalidTransition {
            from: self.status,
            transition: transition.label(),
        };
        let mut next = self.clone();
        match (transition, self.status) {
            (ClaimTransition::Challenge, Provisional) => next.status = Challenged,
            (ClaimTransition::Anchor, Provisional | Challenged | Quarantined) => {
                next.status = Anchored;
                next.tainted = false;
            }
            (ClaimTransition::Canonicalize(readiness), Anchored) => {
                if !self.has_provenance() {
                    return Err(ClaimError::CanonicalPrerequisite("claim has no provenance"));
                }
                if self.tainted {
                    return Err(ClaimError::CanonicalPrerequisite("claim is tainted"));
                }
                readiness.check()?;
                next.status = Canonical;
            }
            (ClaimTransition::Quarantine, Provisional | Challenged | Anchored | Quarantined) => {
                next.status = Quarantined;
                next.tainted = true;
            }
            (ClaimTransition::Expire, Provisional | Challenged | Anchored | Quarantined) => {
                next.status = ClaimStatus::Expired;
            }
            (ClaimTransition::Demote, Canonical) => next.status = Provisional,
            _ => return Err(invalid()),
        }
        Ok(next)
    }
}

// ============================================================================
// SECTION: Reinforcement
// ============================================================================

/// New evidence offered in support of an existing claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinforcement {
    /// Evidence reference to append.
    pub evidence: EvidenceRef,
    /// When the evidence was observed.
    pub observed_at: Timestamp,
    /// Whether the decay clock restarts at `observed_at`.
    #[serde(default)]
    pub resets_clock: bool,
}

// ============================================================================
// SECTION: Transitions
// ============================================================================

/// Facts required to promote an anchored claim to canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalReadiness {
    /// The claim passed every gate in its latest evaluation.
    pub passed_all_gates: bool,
    /// A challenger pass ran and the claim survived it.
    pub survived_challenge: bool,
    /// The integrator logged residuals for the claim.
    pub residuals_logged: bool,
}

impl CanonicalReadiness {
    /// Fails with the first missing prerequisite.
    fn check(self) -> Result<(), ClaimError> {
        if !self.passed_all_gates {
            return Err(ClaimError::CanonicalPrerequisite("claim did not pass all gates"));
        }
        if !self.survived_challenge {
            return Err(ClaimError::CanonicalPrerequisite("claim did not survive challenge"));
        }
        if !self.residuals_logged {
            return Err(ClaimError::CanonicalPrerequisite("claim has no logged residuals"));
        }
        Ok(())
    }
}

/// Lifecycle transition applied through [`ClaimRecord::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "readiness", rename_all = "snake_case")]
pub enum ClaimTransition {
    /// A challenger entry was recorded against the claim.
    Challenge,
    /// External grounding confirmed; clears taint.
    Anchor,
    /// Promote to canonical.
    Canonicalize(CanonicalReadiness),
    /// Claim written under an unresolved tainted context.
    Quarantine,
    /// Decayed confidence fell below the expiry floor.
    Expire,
    /// Decay-driven demotion of a canonical claim.
    Demote,
}

impl ClaimTransition {
    /// Returns a stable label for error reporting.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Challenge => "challenge",
            Self::Anchor => "anchor",
            Self::Canonicalize(_) => "canonicalize",
            Self::Quarantine => "quarantine",
            Self::Expire => "expire",
            Self::Demote => "demote",
        }
    }

    /// Returns the status a successful transition lands in.
    #[must_use]
    pub const fn target_status(self) -> ClaimStatus {
        match self {
            Self::Challenge => ClaimStatus::Challenged,
            Self::Anchor => ClaimStatus::Anchored,
            Self::Canonicalize(_) => ClaimStatus::Canonical,
            Self::Quarantine => ClaimStatus::Quarantined,
            Self::Expire => ClaimStatus::Expired,
            Self::Demote => ClaimStatus::Provisional,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Claim model errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Reinforcing evidence has no provenance.
    #[error("InvalidEvidenceError: evidence `{0}` lacks provenance")]
    InvalidEvidence(String),
    /// Transition is not allowed from the current status.
    #[error("invalid claim transition {transition} from {from}")]
    InvalidTransition {
        /// Status the claim was in.
        from: ClaimStatus,
        /// Attempted transition label.
        transition: &'static str,
    },
    /// Canonical promotion prerequisites are missing.
    #[error("canonical promotion refused: {0}")]
    CanonicalPrerequisite(&'static str),
}
