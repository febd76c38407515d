// crates/routeguard-core/src/runtime/pipeline.rs
// ============================================================================
// Module: RouteGuard Gate Pipeline
// Description: Ordered gate evaluation, short-circuit policy, and decisions.
// Purpose: Provide the single programmatic entry point `evaluate`.
// Dependencies: crate::core, crate::runtime::{decay, gates, repair, taint}
// ============================================================================

//! ## Overview
//! [`evaluate`] runs the gates of [`GATES`] in order against one request:
//!
//! - a hard failure records its violations and stops the pipeline, so no
//!   gate result follows the failing gate;
//! - a soft failure records its violations, sets the outcome to `DENY`, and
//!   lets later gates run;
//! - a warning-only failure is recorded in `warnings` and changes nothing.
//!
//! The function is infallible and deterministic for a fixed
//! `(request, policy, now)`. It reads no clock and mutates nothing.
//!
//! Request state machine: `RECEIVED -> EVALUATING(i) -> ALLOWED | DENIED |
//! QUARANTINED`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::claim::ClaimRecord;
use crate::core::claim::ClaimTransition;
use crate::core::decision::ClaimTransitionRecord;
use crate::core::decision::Decision;
use crate::core::decision::DecisionOutcome;
use crate::core::decision::DecisionRequest;
use crate::core::decision::GateResult;
use crate::core::decision::Violation;
use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::hash_canonical_json;
use crate::core::policy::GateSeverity;
use crate::core::policy::ValidatedPolicy;
use crate::core::time::Timestamp;
use crate::runtime::decay::DecayAction;
use crate::runtime::decay::decay;
use crate::runtime::gates::GATES;
use crate::runtime::gates::GateContext;
use crate::runtime::gates::GateDescriptor;
use crate::runtime::repair::repair_plan;
use crate::runtime::taint::TaintTracker;

// ============================================================================
// SECTION: Pipeline Run
// ============================================================================

/// Raw output of one pipeline run, before transitions and repair synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// Outcome after all evaluated gates.
    pub outcome: DecisionOutcome,
    /// Results for every gate that ran.
    pub gate_results: Vec<GateResult>,
    /// Violations affecting the outcome.
    pub violations: Vec<Violation>,
    /// Warning-only violations.
    pub warnings: Vec<Violation>,
}

/// Runs `gates` in order against `ctx`.
#[must_use]
pub fn run_pipeline(gates: &[GateDescriptor], ctx: &GateContext<'_>) -> PipelineRun {
    let mut run = PipelineRun {
        outcome: DecisionOutcome::Allow,
        gate_results: Vec::with_capacity(gates.len()),
        violations: Vec::new(),
        warnings: Vec::new(),
    };
    for descriptor in gates {
        let check = (descriptor.check)(ctx);
        let passed = check.passed();
        run.gate_results.push(GateResult {
            gate: descriptor.gate,
            passed,
            detail: check.detail,
        });
        if passed {
            continue;
        }
        let violations = check.findings.into_iter().map(|finding| Violation {
            code: finding.code,
            gate: descriptor.gate,
            detail: finding.detail,
        });
        match descriptor.severity.resolve(ctx.policy, ctx.request.action) {
            GateSeverity::Warning => run.warnings.extend(violations),
            GateSeverity::Soft => {
                run.violations.extend(violations);
                run.outcome = DecisionOutcome::Deny;
            }
            GateSeverity::Hard => {
                run.violations.extend(violations);
                run.outcome = if check.quarantine && run.outcome == DecisionOutcome::Allow {
                    DecisionOutcome::Quarantine
                } else {
                    DecisionOutcome::Deny
                };
                break;
            }
        }
    }
    run
}

// ============================================================================
// SECTION: Evaluate
// ============================================================================

/// Evaluates `request` against `policy` at time `now`.
#[must_use]
pub fn evaluate(request: &DecisionRequest, policy: &ValidatedPolicy, now: Timestamp) -> Decision {
    let taint = TaintTracker::observe(request);
    let ctx = GateContext {
        request,
        policy,
        now,
        taint: &taint,
    };
    let run = run_pipeline(&GATES, &ctx);
    let transitions = recommend_transitions(&ctx, run.outcome);
    let repair = (run.outcome != DecisionOutcome::Allow).then(|| repair_plan(&run.violations));
    Decision {
        action: request.action,
        action_name: request.action_name.clone(),
        decision: run.outcome,
        gate_results: run.gate_results,
        violations: run.violations,
        warnings: run.warnings,
        repair_plan: repair,
        transitions,
        policy_id: policy.policy_id().clone(),
        evaluated_at: now,
        request_hash: hash_canonical_json(DEFAULT_HASH_ALGORITHM, request).ok(),
    }
}

// ============================================================================
// SECTION: Transitions
// ============================================================================

/// Recommends at most one status transition per request claim.
///
/// Decay recommendations take precedence, then quarantine, then anchoring.
fn recommend_transitions(
    ctx: &GateContext<'_>,
    outcome: DecisionOutcome,
) -> Vec<ClaimTransitionRecord> {
    let request = ctx.request;
    let unresolved = ctx.taint.unresolved(&request.claims, &request.cycle);
    let anchored = request.cycle.anchored_claims();
    let decay_policy = &ctx.policy.policy().decay;
    request
        .claims
        .iter()
        .filter_map(|claim| {
            let decayed = decay(claim, ctx.now, decay_policy).ok().map(|result| result.action);
            let (transition, reason) = match decayed {
                Some(DecayAction::Expire) => {
                    (ClaimTransition::Expire, "decayed below expiry floor")
                }
                Some(DecayAction::Demote) => {
                    (ClaimTransition::Demote, "decayed below canonical floor")
                }
                _ if outcome == DecisionOutcome::Quarantine => {
                    (ClaimTransition::Quarantine, "memory write under unanchored tainted context")
                }
                _ if outcome == DecisionOutcome::Allow && unresolved.contains(&claim.id) => {
                    (ClaimTransition::Quarantine, "claim taint not resolved by an anchor entry")
                }
                _ if outcome == DecisionOutcome::Allow && anchored.contains(&claim.id) => {
                    (ClaimTransition::Anchor, "anchor entry verified the claim")
                }
                _ => return None,
            };
            record(claim, transition, reason)
        })
        .collect()
}

/// Builds a transition record when the move changes a claim's status legally.
fn record(
    claim: &ClaimRecord,
    transition: ClaimTransition,
    reason: &str,
) -> Option<ClaimTransitionRecord> {
    let next = claim.transition(transition).ok()?;
    if next.status == claim.status && next.tainted == claim.tainted {
        return None;
    }
    Some(ClaimTransitionRecord {
        claim_id: claim.id.clone(),
        from: claim.status,
        to: next.status,
        transition,
        reason: reason.to_string(),
    })
}
