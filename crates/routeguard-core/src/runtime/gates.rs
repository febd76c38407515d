// crates/routeguard-core/src/runtime/gates.rs
// ============================================================================
// Module: RouteGuard Gate Table
// Description: The eight ordered gate descriptors and their checks.
// Purpose: Express the gate checklist as data run by one generic pipeline loop.
// Dependencies: crate::core, crate::runtime::{decay, taint, validator}
// ============================================================================

//! ## Overview
//! Each gate is a [`GateDescriptor`]: a stable name, a severity rule, and a
//! pure check function over a [`GateContext`]. [`GATES`] lists them in
//! protocol order. Adding a gate means appending one descriptor.
//!
//! Checks never fail with an error. Every problem they find is reported as a
//! [`Finding`] so the pipeline can fold it into the decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::claim::ClaimKind;
use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimStatus;
use crate::core::claim::EvidenceRef;
use crate::core::cycle::ProposalMode;
use crate::core::cycle::Role;
use crate::core::decision::ActionKind;
use crate::core::decision::DecisionRequest;
use crate::core::decision::GateName;
use crate::core::decision::ViolationCode;
use crate::core::identifiers::ClaimId;
use crate::core::policy::GateSeverity;
use crate::core::policy::ValidatedPolicy;
use crate::core::time::Timestamp;
use crate::core::update::UpdateEvent;
use crate::runtime::decay::DecayAction;
use crate::runtime::decay::decay;
use crate::runtime::decay::decay_period;
use crate::runtime::taint::TaintTracker;
use crate::runtime::validator::check_grounding as check_update_grounding;
use crate::runtime::validator::check_uncertainty_delta;
use crate::runtime::validator::measured_uncertainty_delta;
use crate::runtime::validator::recheck_invariants;
use crate::runtime::validator::validate_update;

// ============================================================================
// SECTION: Descriptor Types
// ============================================================================

/// Inputs shared by every gate check.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    /// Request under evaluation.
    pub request: &'a DecisionRequest,
    /// Policy in force.
    pub policy: &'a ValidatedPolicy,
    /// Caller-supplied evaluation time.
    pub now: Timestamp,
    /// Taint observed for the request.
    pub taint: &'a TaintTracker,
}

/// One problem found by a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Violation code.
    pub code: ViolationCode,
    /// Audit detail.
    pub detail: String,
}

impl Finding {
    /// Creates a finding.
    fn new(code: ViolationCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Outcome of one gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateCheck {
    /// Problems found; empty when the gate passed.
    pub findings: Vec<Finding>,
    /// Summary detail recorded in the gate result.
    pub detail: String,
    /// Failure forces a quarantine rather than a denial.
    pub quarantine: bool,
}

impl GateCheck {
    /// Passing check.
    fn pass(detail: impl Into<String>) -> Self {
        Self {
            findings: Vec::new(),
            detail: detail.into(),
            quarantine: false,
        }
    }

    /// Check result built from collected findings.
    fn from_findings(findings: Vec<Finding>, pass_detail: &str) -> Self {
        if findings.is_empty() {
            return Self::pass(pass_detail);
        }
        let detail =
            findings.iter().map(|finding| finding.detail.as_str()).collect::<Vec<_>>().join("; ");
        Self {
            findings,
            detail,
            quarantine: false,
        }
    }

    /// Returns true when no findings were recorded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Gate whose severity is set per action by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurableGate {
    /// Gate 4.
    Falsification,
    /// Gate 5.
    Residuals,
}

/// How a gate's failure severity is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityRule {
    /// Always hard.
    Hard,
    /// Read from the policy gate section.
    Configurable(ConfigurableGate),
}

impl SeverityRule {
    /// Resolves the severity for `action` under `policy`.
    #[must_use]
    pub const fn resolve(self, policy: &ValidatedPolicy, action: ActionKind) -> GateSeverity {
        let gates = &policy.policy().gates;
        match self {
            Self::Hard => GateSeverity::Hard,
            Self::Configurable(ConfigurableGate::Falsification) => {
                gates.falsification.for_action(action)
            }
            Self::Configurable(ConfigurableGate::Residuals) => gates.residuals.for_action(action),
        }
    }
}

/// Gate check function.
pub type GateFn = fn(&GateContext<'_>) -> GateCheck;

/// Named, ordered gate.
#[derive(Debug, Clone, Copy)]
pub struct GateDescriptor {
    /// Stable gate name.
    pub gate: GateName,
    /// Severity rule.
    pub severity: SeverityRule,
    /// Check function.
    pub check: GateFn,
}

/// Gates in protocol order.
pub const GATES: [GateDescriptor; 8] = [
    GateDescriptor {
        gate: GateName::SourceAndFieldsPresent,
        severity: SeverityRule::Hard,
        check: check_fields,
    },
    GateDescriptor {
        gate: GateName::TaintedContextCheck,
        severity: SeverityRule::Hard,
        check: check_taint,
    },
    GateDescriptor {
        gate: GateName::SignalGrounding,
        severity: SeverityRule::Hard,
        check: check_grounding,
    },
    GateDescriptor {
        gate: GateName::FalsificationAttempted,
        severity: SeverityRule::Configurable(ConfigurableGate::Falsification),
        check: check_falsification,
    },
    GateDescriptor {
        gate: GateName::ResidualsReported,
        severity: SeverityRule::Configurable(ConfigurableGate::Residuals),
        check: check_residuals,
    },
    GateDescriptor {
        gate: GateName::InvariantPreservedOrUncertaintyPaid,
        severity: SeverityRule::Hard,
        check: check_invariants,
    },
    GateDescriptor {
        gate: GateName::ToolPermissionGate,
        severity: SeverityRule::Hard,
        check: check_tool_permission,
    },
    GateDescriptor {
        gate: GateName::NoForbiddenPractices,
        severity: SeverityRule::Hard,
        check: check_forbidden_practices,
    },
];

// ============================================================================
// SECTION: Gate 1 - Source and Fields Present
// ============================================================================

/// Structural checks on the request, claims, update, and cycle.
fn check_fields(ctx: &GateContext<'_>) -> GateCheck {
    let request = ctx.request;
    let policy = ctx.policy.policy();
    let mut findings = Vec::new();

    let policy_id = ctx.policy.policy_id();
    if let Some(policy_ref) = &request.policy_ref
        && policy_ref != policy_id
    {
        findings.push(Finding::new(
            ViolationCode::MalformedField,
            format!("policy_ref {policy_ref} does not match policy in force {policy_id}"),
        ));
    }

    match &request.action_name {
        Some(name) if name.as_str().trim().is_empty() => {
            findings.push(Finding::new(ViolationCode::MissingField, "action_name is empty"));
        }
        Some(name) => {
            let name = name.normalized();
            let has_subject =
                request.context.subject.as_deref().is_some_and(|subject| !subject.trim().is_empty());
            if policy.subjects.requires_subject(name.namespace()) && !has_subject {
                findings.push(Finding::new(
                    ViolationCode::MissingSubject,
                    format!("agency-bearing action {name} has no subject"),
                ));
            }
        }
        None if request.action == ActionKind::ToolExecution => {
            findings.push(Finding::new(
                ViolationCode::MissingField,
                "tool execution requires action_name",
            ));
        }
        None => {}
    }

    if request.action == ActionKind::MemoryCommit
        && request.claims.is_empty()
        && request.update_event.is_none()
    {
        findings.push(Finding::new(
            ViolationCode::MissingField,
            "memory commit carries no claims or update_event",
        ));
    }

    let mut ids = BTreeSet::new();
    for claim in &request.claims {
        check_claim_fields(claim, "claim", ctx, &mut findings);
        if !ids.insert(&claim.id) {
            findings.push(Finding::new(
                ViolationCode::MalformedField,
                format!("claim id {} appears more than once", claim.id),
            ));
        }
    }

    if let Some(event) = &request.update_event {
        check_update_fields(event, ctx, &mut findings);
    }

    if let Err(err) = request.cycle.stage() {
        findings.push(Finding::new(ViolationCode::CycleOutOfOrder, err.to_string()));
    }
    for role in request.action.required_roles() {
        if !request.cycle.has_role(*role) {
            findings.push(Finding::new(
                ViolationCode::MissingRole,
                format!("{} requires a {role} entry", request.action),
            ));
        }
    }

    if let Some(approval) = &request.context.human_approval
        && (approval.approver.trim().is_empty() || approval.domain.trim().is_empty())
    {
        findings.push(Finding::new(
            ViolationCode::MalformedField,
            "human_approval needs an approver and a domain",
        ));
    }

    GateCheck::from_findings(findings, "required fields present")
}

/// Field checks for one claim record.
fn check_claim_fields(
    claim: &ClaimRecord,
    label: &str,
    ctx: &GateContext<'_>,
    findings: &mut Vec<Finding>,
) {
    if claim.id.as_str().trim().is_empty() {
        findings.push(Finding::new(ViolationCode::MissingField, format!("{label} id is empty")));
    }
    for (field, value) in [("confidence", claim.confidence), ("uncertainty", claim.uncertainty)] {
        if !value.is_finite() || !(0.0 ..= 1.0).contains(&value) {
            findings.push(Finding::new(
                ViolationCode::MalformedField,
                format!("{label} {} {field} must be in [0, 1]", claim.id),
            ));
        }
    }
    if let Err(err) = decay_period(claim, &ctx.policy.policy().decay) {
        findings.push(Finding::new(ViolationCode::MalformedField, err.to_string()));
    }
    let clock_mismatch = ctx.now.seconds_since(&claim.timestamp).is_none()
        || ctx.now.seconds_since(&claim.decay_clock_start()).is_none();
    if clock_mismatch {
        findings.push(Finding::new(
            ViolationCode::MalformedField,
            format!("{label} {} timestamps use a different clock than the evaluation", claim.id),
        ));
    }
    let blank_evidence = claim
        .support
        .iter()
        .chain(&claim.counter_support)
        .any(|evidence: &EvidenceRef| evidence.reference.trim().is_empty());
    if blank_evidence {
        findings.push(Finding::new(
            ViolationCode::MalformedField,
            format!("{label} {} has an evidence entry without a reference", claim.id),
        ));
    }
}

/// Field checks for the update event.
fn check_update_fields(event: &UpdateEvent, ctx: &GateContext<'_>, findings: &mut Vec<Finding>) {
    if event.claim_id.as_str().trim().is_empty() {
        findings.push(Finding::new(ViolationCode::MissingField, "update_event.claim_id is empty"));
    } else if ctx.request.update_target().is_none() {
        findings.push(Finding::new(
            ViolationCode::MissingField,
            format!("update_event targets claim {} absent from request claims", event.claim_id),
        ));
    }
    for (field, digest) in
        [("before_state_hash", &event.before_state_hash), ("after_state_hash", &event.after_state_hash)]
    {
        if !digest.is_well_formed() {
            findings.push(Finding::new(
                ViolationCode::MalformedField,
                format!("update_event.{field} is not a well-formed digest"),
            ));
        }
    }
    if event.changed_fields.is_empty() {
        findings.push(Finding::new(
            ViolationCode::MissingField,
            "update_event.changed_fields is empty",
        ));
    }
    if !event.uncertainty_delta.is_finite() {
        findings.push(Finding::new(
            ViolationCode::MalformedField,
            "update_event.uncertainty_delta must be finite",
        ));
    }
    if event.audit_trail.iter().any(|entry| entry.field.trim().is_empty()) {
        findings.push(Finding::new(
            ViolationCode::MissingField,
            "update_event.audit_trail entry has no field",
        ));
    }
    check_claim_fields(&event.after_state, "after_state", ctx, findings);
}

// ============================================================================
// SECTION: Gate 2 - Tainted Context
// ============================================================================

/// Tainted requests need an anchor entry.
fn check_taint(ctx: &GateContext<'_>) -> GateCheck {
    if !ctx.taint.is_tainted() {
        return GateCheck::pass("context untainted");
    }
    if ctx.request.cycle.has_role(Role::Anchor) {
        return GateCheck::pass("tainted context has an anchor entry");
    }
    let reasons =
        ctx.taint.reasons().iter().map(|reason| reason.describe()).collect::<Vec<_>>().join(", ");
    let mut check = GateCheck::from_findings(
        vec![Finding::new(
            ViolationCode::TaintedContext,
            format!("tainted context without anchor: {reasons}"),
        )],
        "",
    );
    check.quarantine = ctx.request.action == ActionKind::MemoryCommit;
    check
}

// ============================================================================
// SECTION: Gate 3 - Signal Grounding
// ============================================================================

/// Confidence rises must be grounded and referenced claims must be live.
fn check_grounding(ctx: &GateContext<'_>) -> GateCheck {
    let request = ctx.request;
    let policy = ctx.policy.policy();
    let mut findings = Vec::new();
    if let (Some(event), Some(before)) = (&request.update_event, request.update_target())
        && let Err(err) = check_uncertainty_delta(event, before)
            .and_then(|()| check_update_grounding(event, before, &request.cycle, &policy.grounding))
    {
        findings.push(Finding::new(ViolationCode::UngroundedConfidence, err.to_string()));
    }
    for claim in &request.claims {
        if claim.status == ClaimStatus::Expired {
            findings.push(Finding::new(
                ViolationCode::ExpiredClaim,
                format!("claim {} is expired", claim.id),
            ));
            continue;
        }
        match decay(claim, ctx.now, &policy.decay) {
            Ok(result) if result.action == DecayAction::Expire => {
                findings.push(Finding::new(
                    ViolationCode::ExpiredClaim,
                    format!(
                        "claim {} decayed to {:.4}, below expiry floor {}",
                        claim.id, result.effective_confidence, policy.decay.expiry_floor
                    ),
                ));
            }
            Ok(_) => {}
            Err(err) => findings.push(Finding::new(ViolationCode::ExpiredClaim, err.to_string())),
        }
    }
    GateCheck::from_findings(findings, "confidence grounded and claims live")
}

// ============================================================================
// SECTION: Gate 4 - Falsification Attempted
// ============================================================================

/// High-impact actions need a challenger pass.
fn check_falsification(ctx: &GateContext<'_>) -> GateCheck {
    let action = ctx.request.action;
    if !ctx.policy.policy().gates.is_high_impact(action) {
        return GateCheck::pass(format!("{action} is not high impact"));
    }
    if ctx.request.cycle.has_role(Role::Challenger) {
        return GateCheck::pass("challenger entry present");
    }
    GateCheck::from_findings(
        vec![Finding::new(
            ViolationCode::NoChallenger,
            format!("high-impact {action} has no challenger entry"),
        )],
        "",
    )
}

// ============================================================================
// SECTION: Gate 5 - Residuals Reported
// ============================================================================

/// Integrator output must log residuals unless an auditor grounds their absence.
fn check_residuals(ctx: &GateContext<'_>) -> GateCheck {
    let cycle = &ctx.request.cycle;
    let applies = cycle.has_role(Role::Integrator)
        || ctx.request.action.required_roles().contains(&Role::Integrator);
    if !applies {
        return GateCheck::pass("no integrator output to inspect");
    }
    let logged = cycle.residuals().count();
    if logged > 0 {
        return GateCheck::pass(format!("{logged} residual(s) logged"));
    }
    if cycle.auditor_grounds_absent_residuals() {
        return GateCheck::pass("auditor grounds absence of residuals");
    }
    GateCheck::from_findings(
        vec![Finding::new(ViolationCode::MissingResiduals, "integrator logged no residuals")],
        "",
    )
}

// ============================================================================
// SECTION: Gate 6 - Invariant Preserved or Uncertainty Paid
// ============================================================================

/// Updates must validate and either keep invariants or pay for breaking them.
fn check_invariants(ctx: &GateContext<'_>) -> GateCheck {
    let request = ctx.request;
    let Some(event) = &request.update_event else {
        return GateCheck::pass("no update event");
    };
    let violation = |detail: String| {
        GateCheck::from_findings(vec![Finding::new(ViolationCode::InvariantViolation, detail)], "")
    };
    let Some(before) = request.update_target() else {
        return violation(format!("no pre-state for claim {}", event.claim_id));
    };
    if let Err(err) =
        validate_update(event, before, &request.cycle, &ctx.policy.policy().grounding)
    {
        return violation(err.to_string());
    }
    let recheck = recheck_invariants(before, &event.after_state);
    if event.invariants_preserved {
        return match recheck {
            Ok(()) => GateCheck::pass("update validated and invariants preserved"),
            Err(err) => violation(format!("declared invariants_preserved but {err}")),
        };
    }
    let confidence_change = event.after_state.confidence - before.confidence;
    let paid = measured_uncertainty_delta(event, before);
    if paid > 0.0 && paid >= confidence_change {
        return GateCheck::pass("declared invariant break paid by an uncertainty rise");
    }
    violation(format!(
        "declared invariant break not paid: uncertainty rose {paid:.4} vs confidence change \
         {confidence_change:.4}"
    ))
}

// ============================================================================
// SECTION: Gate 7 - Tool Permission
// ============================================================================

/// Tool executions must satisfy the tool policy.
fn check_tool_permission(ctx: &GateContext<'_>) -> GateCheck {
    let request = ctx.request;
    if request.action != ActionKind::ToolExecution {
        return GateCheck::pass("not a tool execution");
    }
    let tools = &ctx.policy.policy().tools;
    let denied = |detail: String| Finding::new(ViolationCode::ToolPermissionDenied, detail);
    let Some(name) = request.action_name.as_ref().map(|name| name.normalized()) else {
        return GateCheck::from_findings(vec![denied("tool action has no name".to_string())], "");
    };
    let context = &request.context;
    let mut findings = Vec::new();

    if tools.is_forbidden(&name) {
        findings.push(denied(format!("action {name} is forbidden")));
    } else if !tools.is_allowlisted(&name) {
        findings.push(denied(format!("action {name} is not on the allowlist")));
    }
    if tools.sandbox.required {
        let allowed = context
            .sandbox_profile
            .as_ref()
            .is_some_and(|profile| tools.sandbox.allowed_profiles.contains(profile));
        if !allowed {
            findings.push(denied("sandbox profile missing or not allowed".to_string()));
        }
    }
    if context.destructive && tools.destructive_requires_dry_run && !context.dry_run {
        findings.push(denied(format!("destructive action {name} must run as a dry run")));
    }
    if let Some(domain) = context.domain.as_deref()
        && tools.approval_domains.iter().any(|entry| entry == domain)
    {
        match &context.human_approval {
            None => findings.push(denied(format!("domain {domain} requires human approval"))),
            Some(approval) if approval.domain != domain => findings.push(denied(format!(
                "human approval covers {} not {domain}",
                approval.domain
            ))),
            Some(_) => {}
        }
    }
    if let Some(limit) = tools.rate_limit_for(&name) {
        let window_seconds = window_seconds(limit.window_ms);
        let recent = context
            .recent_invocations
            .iter()
            .filter(|at| ctx.now.seconds_since(at).is_none_or(|elapsed| elapsed < window_seconds))
            .count();
        if recent >= usize::try_from(limit.max_invocations).unwrap_or(usize::MAX) {
            findings.push(denied(format!(
                "rate limit for {name} exceeded: {recent} invocation(s) in {} ms",
                limit.window_ms
            )));
        }
    }
    GateCheck::from_findings(findings, "tool permitted")
}

/// Converts a window length in milliseconds to seconds.
#[allow(clippy::cast_precision_loss, reason = "Window lengths are bounded by policy validation.")]
fn window_seconds(window_ms: u64) -> f64 {
    window_ms as f64 / 1_000.0
}

// ============================================================================
// SECTION: Gate 8 - No Forbidden Practices
// ============================================================================

/// Rejects known-bad cycle and claim patterns.
fn check_forbidden_practices(ctx: &GateContext<'_>) -> GateCheck {
    let request = ctx.request;
    let cycle = &request.cycle;
    let mut findings = Vec::new();

    for proposer in cycle.proposers().filter(|entry| entry.mode == ProposalMode::Summary) {
        let has_new_input = proposer.input_refs.iter().any(|reference| {
            let reference = reference.trim();
            !reference.is_empty() && request.claim(&ClaimId::from(reference)).is_none()
        });
        if !has_new_input {
            findings.push(Finding::new(
                ViolationCode::RecursiveSummary,
                "summary proposal draws on no new input",
            ));
        }
    }

    let inspected = request
        .claims
        .iter()
        .chain(request.update_event.as_ref().map(|event| &event.after_state));
    for claim in inspected {
        if claim.status == ClaimStatus::Canonical && !claim.has_provenance() {
            findings.push(Finding::new(
                ViolationCode::CanonWithoutSource,
                format!("canonical claim {} has no provenance-bearing support", claim.id),
            ));
        }
        if claim.kind == ClaimKind::Identity && claim.uncertainty <= 0.0 {
            findings.push(Finding::new(
                ViolationCode::IdentityWithoutUncertainty,
                format!("identity claim {} carries no uncertainty", claim.id),
            ));
        }
    }

    if cycle.reports_consensus() && !cycle.has_role(Role::Challenger) {
        findings.push(Finding::new(
            ViolationCode::AgreementWithoutChallenger,
            "consensus reported without a challenger entry",
        ));
    }

    if request.action == ActionKind::ToolExecution {
        let unresolved = ctx.taint.unresolved(&request.claims, cycle);
        if !unresolved.is_empty() {
            let ids = unresolved.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ");
            findings.push(Finding::new(
                ViolationCode::ToolUnderTaint,
                format!("tool execution rests on unanchored tainted claims: {ids}"),
            ));
        }
    }

    GateCheck::from_findings(findings, "no forbidden practices")
}
