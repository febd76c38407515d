// crates/routeguard-core/src/core/decision.rs
// ============================================================================
// Module: RouteGuard Decision Model
// Description: Decision requests, gate results, violations, and decisions.
// Purpose: Define the request/response contract of the gate evaluation engine.
// Dependencies: crate::core::{claim, cycle, hashing, identifiers, time, update}, serde
// ============================================================================

//! ## Overview
//! A [`DecisionRequest`] bundles the action an agent wants to take with the
//! claims, optional update event, cycle record, and context flags it rests
//! on. Evaluating it produces a [`Decision`]: the outcome, the ordered gate
//! results, violations, warnings, and a repair plan whenever the outcome is
//! not `ALLOW`. Decisions are created fresh per request and never mutated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::claim::ClaimError;
use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimStatus;
use crate::core::claim::ClaimTransition;
use crate::core::cycle::Cycle;
use crate::core::cycle::Role;
use crate::core::hashing::HashDigest;
use crate::core::identifiers::ActionName;
use crate::core::identifiers::ClaimId;
use crate::core::identifiers::PolicyId;
use crate::core::time::Timestamp;
use crate::core::update::UpdateEvent;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Consequential action class being gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Commit a claim or update into memory.
    MemoryCommit,
    /// Execute a tool call.
    ToolExecution,
    /// Publish output to other agents.
    Publication,
}

impl ActionKind {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MemoryCommit => "MEMORY_COMMIT",
            Self::ToolExecution => "TOOL_EXECUTION",
            Self::Publication => "PUBLICATION",
        }
    }

    /// Returns the cycle roles that must be present for this action.
    #[must_use]
    pub const fn required_roles(self) -> &'static [Role] {
        match self {
            Self::MemoryCommit | Self::Publication => &[Role::Proposer, Role::Integrator],
            Self::ToolExecution => &[Role::Proposer],
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Request
// ============================================================================

/// Trust level of an input feeding the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTrust {
    /// Produced inside the trust boundary.
    Trusted,
    /// Explicitly untrusted input.
    Untrusted,
    /// External input not yet vetted.
    External,
}

/// Input source consulted while building the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSource {
    /// Opaque reference to the input.
    pub reference: String,
    /// Trust level.
    pub trust: SourceTrust,
    /// Whether the input was anchored before this request.
    #[serde(default)]
    pub anchored: bool,
}

/// Human approval attached to a tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalMarker {
    /// Identity of the approver.
    pub approver: String,
    /// Domain the approval covers.
    pub domain: String,
}

/// Context flags accompanying a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Caller-declared taint flag.
    #[serde(default)]
    pub tainted_context: bool,
    /// Identified subject of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Inputs consulted while building the request.
    #[serde(default)]
    pub input_sources: Vec<InputSource>,
    /// Sandbox profile the tool would run under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_profile: Option<String>,
    /// Whether the tool call is a dry run.
    #[serde(default)]
    pub dry_run: bool,
    /// Whether the tool call is destructive.
    #[serde(default)]
    pub destructive: bool,
    /// Risk domain of the tool call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Human approval marker, when obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_approval: Option<ApprovalMarker>,
    /// Times of earlier invocations of the same action, for rate limiting.
    #[serde(default)]
    pub recent_invocations: Vec<Timestamp>,
}

/// Structured request evaluated by the gate pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Action class.
    pub action: ActionKind,
    /// Dotted action name such as `tool.send_email`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<ActionName>,
    /// Claims the action rests on; also the pre-state for update events.
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
    /// Proposed mutation, when the action writes memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_event: Option<UpdateEvent>,
    /// Cycle record supplying role evidence.
    #[serde(default)]
    pub cycle: Cycle,
    /// Context flags.
    #[serde(default)]
    pub context: RequestContext,
    /// Policy the caller expects to be evaluated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_ref: Option<PolicyId>,
}

impl DecisionRequest {
    /// Creates a request with an empty cycle and default context.
    #[must_use]
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            action_name: None,
            claims: Vec::new(),
            update_event: None,
            cycle: Cycle::default(),
            context: RequestContext::default(),
            policy_ref: None,
        }
    }

    /// Returns the claim with the given identifier.
    #[must_use]
    pub fn claim(&self, id: &ClaimId) -> Option<&ClaimRecord> {
        self.claims.iter().find(|claim| &claim.id == id)
    }

    /// Returns the pre-state claim targeted by the update event.
    #[must_use]
    pub fn update_target(&self) -> Option<&ClaimRecord> {
        self.update_event.as_ref().and_then(|event| self.claim(&event.claim_id))
    }
}

// ============================================================================
// SECTION: Gates
// ============================================================================

/// Pipeline gate names in protocol order.
///
/// # Invariants
/// - Numbering is stable; new gates are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateName {
    /// Gate 1.
    SourceAndFieldsPresent,
    /// Gate 2.
    TaintedContextCheck,
    /// Gate 3.
    SignalGrounding,
    /// Gate 4.
    FalsificationAttempted,
    /// Gate 5.
    ResidualsReported,
    /// Gate 6.
    InvariantPreservedOrUncertaintyPaid,
    /// Gate 7.
    ToolPermissionGate,
    /// Gate 8.
    NoForbiddenPractices,
}

impl GateName {
    /// Returns the 1-based gate number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::SourceAndFieldsPresent => 1,
            Self::TaintedContextCheck => 2,
            Self::SignalGrounding => 3,
            Self::FalsificationAttempted => 4,
            Self::ResidualsReported => 5,
            Self::InvariantPreservedOrUncertaintyPaid => 6,
            Self::ToolPermissionGate => 7,
            Self::NoForbiddenPractices => 8,
        }
    }

    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SourceAndFieldsPresent => "SOURCE_AND_FIELDS_PRESENT",
            Self::TaintedContextCheck => "TAINTED_CONTEXT_CHECK",
            Self::SignalGrounding => "SIGNAL_GROUNDING",
            Self::FalsificationAttempted => "FALSIFICATION_ATTEMPTED",
            Self::ResidualsReported => "RESIDUALS_REPORTED",
            Self::InvariantPreservedOrUncertaintyPaid => "INVARIANT_PRESERVED_OR_UNCERTAINTY_PAID",
            Self::ToolPermissionGate => "TOOL_PERMISSION_GATE",
            Self::NoForbiddenPractices => "NO_FORBIDDEN_PRACTICES",
        }
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    /// Gate name.
    pub gate: GateName,
    /// Whether the gate passed.
    pub passed: bool,
    /// Human-readable detail.
    pub detail: String,
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Structured violation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// Agency-bearing action without an identified subject.
    MissingSubject,
    /// Required field absent or empty.
    MissingField,
    /// Field present but out of range or badly formatted.
    MalformedField,
    /// Cycle lacks a role the action requires.
    MissingRole,
    /// Cycle entries violate the role order.
    CycleOutOfOrder,
    /// Tainted context without an anchor entry.
    TaintedContext,
    /// Confidence rose without grounding.
    UngroundedConfidence,
    /// A referenced claim has expired.
    ExpiredClaim,
    /// High-impact action without a challenger pass.
    NoChallenger,
    /// Integrator logged no residuals.
    MissingResiduals,
    /// Update failed validation or broke invariants unpaid.
    InvariantViolation,
    /// Tool call not permitted by policy.
    ToolPermissionDenied,
    /// Summary produced without new input.
    RecursiveSummary,
    /// Canonical claim without a provenance-bearing source.
    CanonWithoutSource,
    /// Consensus reported with no challenger.
    AgreementWithoutChallenger,
    /// Identity claim with zero uncertainty.
    IdentityWithoutUncertainty,
    /// Tool execution while claim taint is unresolved.
    ToolUnderTaint,
}

impl ViolationCode {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingSubject => "MISSING_SUBJECT",
            Self::MissingField => "MISSING_FIELD",
            Self::MalformedField => "MALFORMED_FIELD",
            Self::MissingRole => "MISSING_ROLE",
            Self::CycleOutOfOrder => "CYCLE_OUT_OF_ORDER",
            Self::TaintedContext => "TAINTED_CONTEXT",
            Self::UngroundedConfidence => "UNGROUNDED_CONFIDENCE",
            Self::ExpiredClaim => "EXPIRED_CLAIM",
            Self::NoChallenger => "NO_CHALLENGER",
            Self::MissingResiduals => "MISSING_RESIDUALS",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::ToolPermissionDenied => "TOOL_PERMISSION_DENIED",
            Self::RecursiveSummary => "RECURSIVE_SUMMARY",
            Self::CanonWithoutSource => "CANON_WITHOUT_SOURCE",
            Self::AgreementWithoutChallenger => "AGREEMENT_WITHOUT_CHALLENGER",
            Self::IdentityWithoutUncertainty => "IDENTITY_WITHOUT_UNCERTAINTY",
            Self::ToolUnderTaint => "TOOL_UNDER_TAINT",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation raised by a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation code.
    pub code: ViolationCode,
    /// Gate that raised it.
    pub gate: GateName,
    /// Detail for audit, including validator error names.
    pub detail: String,
}

/// Canned corrective step for one violation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairStep {
    /// Violation code the step repairs.
    pub code: ViolationCode,
    /// Corrective instruction.
    pub step: String,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Final decision outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    /// Action permitted.
    Allow,
    /// Action refused.
    Deny,
    /// Written but not promotable until anchored.
    Quarantine,
}

impl DecisionOutcome {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
            Self::Quarantine => "QUARANTINE",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended claim status change for the caller to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTransitionRecord {
    /// Claim to transition.
    pub claim_id: ClaimId,
    /// Status observed at evaluation time.
    pub from: ClaimStatus,
    /// Status after the transition.
    pub to: ClaimStatus,
    /// Transition to apply.
    pub transition: ClaimTransition,
    /// Why the transition is recommended.
    pub reason: String,
}

/// Audit-immutable result of evaluating a decision request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Action class evaluated.
    pub action: ActionKind,
    /// Action name, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<ActionName>,
    /// Outcome.
    pub decision: DecisionOutcome,
    /// Ordered results for every gate that ran.
    pub gate_results: Vec<GateResult>,
    /// Violations affecting the outcome, in gate order.
    pub violations: Vec<Violation>,
    /// Violations from warning-only gates.
    #[serde(default)]
    pub warnings: Vec<Violation>,
    /// Corrective steps; present iff the outcome is not `ALLOW`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_plan: Option<Vec<RepairStep>>,
    /// Recommended claim transitions.
    #[serde(default)]
    pub transitions: Vec<ClaimTransitionRecord>,
    /// Policy evaluated against.
    pub policy_id: PolicyId,
    /// Evaluation time supplied by the caller.
    pub evaluated_at: Timestamp,
    /// Canonical hash of the request, when it could be canonicalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_hash: Option<HashDigest>,
}

impl Decision {
    /// Returns the bare violation code sequence.
    #[must_use]
    pub fn violation_codes(&self) -> Vec<ViolationCode> {
        self.violations.iter().map(|violation| violation.code).collect()
    }

    /// Returns true when the outcome is `ALLOW`.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.decision == DecisionOutcome::Allow
    }

    /// Returns the last gate that ran.
    #[must_use]
    pub fn last_gate(&self) -> Option<GateName> {
        self.gate_results.last().map(|result| result.gate)
    }

    /// Applies the recommended transitions to matching claims.
    ///
    /// Claims without a recommendation are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError`] when a claim no longer admits its transition.
    pub fn apply_transitions(&self, claims: &[ClaimRecord]) -> Result<Vec<ClaimRecord>, ClaimError> {
        claims
            .iter()
            .map(|claim| {
                self.transitions
                    .iter()
                    .filter(|record| record.claim_id == claim.id)
                    .try_fold(claim.clone(), |current, record| current.transition(record.transition))
            })
            .collect()
    }
}
