// crates/routeguard-core/src/core/cycle.rs
// ============================================================================
// Module: RouteGuard Cycle Model
// Description: Role-separated coordination record and its stage machine.
// Purpose: Supply the cycle evidence gates inspect (challenger, anchor, residuals).
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! A cycle is the ordered list of role entries that produced the claims and
//! updates under evaluation. The cycle carries no verdict of its own; gates
//! read it to answer questions such as "was there a challenger?" or "did the
//! integrator log residuals?".
//!
//! ## Stage Machine
//! Replaying the entries drives [`CycleStage`]:
//!
//! | Stage | Accepts |
//! |-------|---------|
//! | `Empty` | Proposer |
//! | `Proposed` | Challenger, Anchor, Integrator |
//! | `Challenged` | Challenger, Anchor, Integrator |
//! | `Anchored` | Integrator |
//! | `Integrated` | Auditor |
//! | `Audited` | nothing |

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ClaimId;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Cycle role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates provisional claims.
    Proposer,
    /// Attempts to falsify proposals.
    Challenger,
    /// Confirms external grounding.
    Anchor,
    /// Merges the cycle into update events and logs residuals.
    Integrator,
    /// Optional reviewer of the integrated result.
    Auditor,
}

impl Role {
    /// Returns the stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposer => "proposer",
            Self::Challenger => "challenger",
            Self::Anchor => "anchor",
            Self::Integrator => "integrator",
            Self::Auditor => "auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Role Entries
// ============================================================================

/// Whether a proposer produced original claims or summarized existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalMode {
    /// New claims drawn from inputs.
    #[default]
    Original,
    /// Summary of earlier material.
    Summary,
}

/// Proposer output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProposerEntry {
    /// Claims created in this step.
    #[serde(default)]
    pub claim_ids: Vec<ClaimId>,
    /// Proposal mode.
    #[serde(default)]
    pub mode: ProposalMode,
    /// References to the inputs the proposal drew on.
    #[serde(default)]
    pub input_refs: Vec<String>,
}

/// Challenger output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChallengerEntry {
    /// Objections raised against the proposal.
    #[serde(default)]
    pub objections: Vec<String>,
}

/// Anchor output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnchorEntry {
    /// External grounding references consulted.
    #[serde(default)]
    pub grounding_refs: Vec<String>,
    /// Claims whose grounding was confirmed.
    #[serde(default)]
    pub verified_claims: Vec<ClaimId>,
}

/// Logged, unresolved disagreement surviving integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residual {
    /// Claim the residual concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<ClaimId>,
    /// What remains in doubt.
    pub description: String,
}

/// Integrator output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntegratorEntry {
    /// Residual doubts logged during integration.
    #[serde(default)]
    pub residuals: Vec<Residual>,
    /// Whether the integrator reports agreement across roles.
    #[serde(default)]
    pub consensus: bool,
}

/// Auditor output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditorEntry {
    /// Auditor explicitly grounds the absence of residuals.
    #[serde(default)]
    pub grounds_absent_residuals: bool,
    /// Free-form audit notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One role step of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleEntry {
    /// Proposer step.
    Proposer(ProposerEntry),
    /// Challenger step.
    Challenger(ChallengerEntry),
    /// Anchor step.
    Anchor(AnchorEntry),
    /// Integrator step.
    Integrator(IntegratorEntry),
    /// Auditor step.
    Auditor(AuditorEntry),
}

impl RoleEntry {
    /// Returns the role that produced the entry.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Proposer(_) => Role::Proposer,
            Self::Challenger(_) => Role::Challenger,
            Self::Anchor(_) => Role::Anchor,
            Self::Integrator(_) => Role::Integrator,
            Self::Auditor(_) => Role::Auditor,
        }
    }
}

// ============================================================================
// SECTION: Stage Machine
// ============================================================================

/// Position reached while replaying a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    /// No entries yet.
    Empty,
    /// A proposer entry was recorded.
    Proposed,
    /// At least one challenger entry was recorded.
    Challenged,
    /// An anchor entry was recorded.
    Anchored,
    /// An integrator entry was recorded.
    Integrated,
    /// An auditor entry closed the cycle.
    Audited,
}

impl CycleStage {
    /// Returns the stage reached after accepting `role`.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::OutOfOrder`] when the stage does not accept `role`.
    pub const fn advance(self, role: Role) -> Result<Self, CycleError> {
        match (self, role) {
            (Self::Empty, Role::Proposer) => Ok(Self::Proposed),
            (Self::Proposed | Self::Challenged, Role::Challenger) => Ok(Self::Challenged),
            (Self::Proposed | Self::Challenged, Role::Anchor) => Ok(Self::Anchored),
            (Self::Proposed | Self::Challenged | Self::Anchored, Role::Integrator) => {
                Ok(Self::Integrated)
            }
            (Self::Integrated, Role::Auditor) => Ok(Self::Audited),
            (stage, role) => Err(CycleError::OutOfOrder {
                stage,
                role,
            }),
        }
    }

    /// Returns the stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Proposed => "proposed",
            Self::Challenged => "challenged",
            Self::Anchored => "anchored",
            Self::Integrated => "integrated",
            Self::Audited => "audited",
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cycle ordering errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Role entry arrived in a stage that does not accept it.
    #[error("{role} entry not accepted at stage {stage}")]
    OutOfOrder {
        /// Stage reached before the offending entry.
        stage: CycleStage,
        /// Role of the offending entry.
        role: Role,
    },
}

// ============================================================================
// SECTION: Cycle Record
// ============================================================================

/// Ordered role sequence backing a decision request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cycle {
    /// Role entries in the order they were produced.
    #[serde(default)]
    pub entries: Vec<RoleEntry>,
}

impl Cycle {
    /// Creates a cycle from ordered entries.
    #[must_use]
    pub const fn new(entries: Vec<RoleEntry>) -> Self {
        Self {
            entries,
        }
    }

    /// Replays the entries and returns the final stage.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] for the first entry the stage machine rejects.
    pub fn stage(&self) -> Result<CycleStage, CycleError> {
        self.entries.iter().try_fold(CycleStage::Empty, |stage, entry| stage.advance(entry.role()))
    }

    /// Returns true when an entry for `role` exists.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.entries.iter().any(|entry| entry.role() == role)
    }

    /// Returns all proposer entries.
    pub fn proposers(&self) -> impl Iterator<Item = &ProposerEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            RoleEntry::Proposer(proposer) => Some(proposer),
            _ => None,
        })
    }

    /// Returns all anchor entries.
    pub fn anchors(&self) -> impl Iterator<Item = &AnchorEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            RoleEntry::Anchor(anchor) => Some(anchor),
            _ => None,
        })
    }

    /// Returns all integrator entries.
    pub fn integrators(&self) -> impl Iterator<Item = &IntegratorEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            RoleEntry::Integrator(integrator) => Some(integrator),
            _ => None,
        })
    }

    /// Returns every residual logged by an integrator.
    pub fn residuals(&self) -> impl Iterator<Item = &Residual> {
        self.integrators().flat_map(|integrator| integrator.residuals.iter())
    }

    /// Returns true when a residual concerns `claim_id` or the cycle as a whole.
    #[must_use]
    pub fn has_residual_for(&self, claim_id: &ClaimId) -> bool {
        self.residuals().any(|residual| residual.claim_id.as_ref().is_none_or(|id| id == claim_id))
    }

    /// Returns the claims an anchor entry verified.
    #[must_use]
    pub fn anchored_claims(&self) -> BTreeSet<&ClaimId> {
        self.anchors().flat_map(|anchor| anchor.verified_claims.iter()).collect()
    }

    /// Returns true when an auditor grounds the absence of residuals.
    #[must_use]
    pub fn auditor_grounds_absent_residuals(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, RoleEntry::Auditor(auditor) if auditor.grounds_absent_residuals))
    }

    /// Returns true when an integrator reports consensus.
    #[must_use]
    pub fn reports_consensus(&self) -> bool {
        self.integrators().any(|integrator| integrator.consensus)
    }
}
