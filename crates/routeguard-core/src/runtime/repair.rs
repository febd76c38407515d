// crates/routeguard-core/src/runtime/repair.rs
// ============================================================================
// Module: RouteGuard Repair Plans
// Description: Canned corrective steps keyed by violation code.
// Purpose: Give callers a deterministic, minimal plan to resubmit a request.
// Dependencies: crate::core::decision
// ============================================================================

//! ## Overview
//! A repair plan holds one step per distinct violation code, in the order
//! the codes first occur. The same violation sequence always yields the same
//! plan, so calling agents can automate resubmission.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::decision::RepairStep;
use crate::core::decision::Violation;
use crate::core::decision::ViolationCode;

// ============================================================================
// SECTION: Repair Steps
// ============================================================================

/// Returns the canned corrective step for `code`.
#[must_use]
pub const fn repair_step(code: ViolationCode) -> &'static str {
    match code {
        ViolationCode::MissingSubject => "attach an identified subject to the action",
        ViolationCode::MissingField => "populate every required claim, update, and action field",
        ViolationCode::MalformedField => "correct out-of-range or malformed field values",
        ViolationCode::MissingRole => "add the cycle roles this action requires",
        ViolationCode::CycleOutOfOrder => {
            "reorder cycle entries as proposer, challenger, anchor, integrator, auditor"
        }
        ViolationCode::TaintedContext => "run an Anchor pass that grounds the untrusted inputs",
        ViolationCode::UngroundedConfidence => {
            "justify the confidence rise and pay for it in uncertainty or log a residual"
        }
        ViolationCode::ExpiredClaim => "reinforce or replace expired claims with fresh evidence",
        ViolationCode::NoChallenger => "run a Challenger pass before resubmitting",
        ViolationCode::MissingResiduals => {
            "log at least one residual or have an Auditor ground their absence"
        }
        ViolationCode::InvariantViolation => {
            "fix the update so it validates, or raise uncertainty to pay for the break"
        }
        ViolationCode::ToolPermissionDenied => {
            "request allowlist addition or use an approved action"
        }
        ViolationCode::RecursiveSummary => "supply new input before summarizing again",
        ViolationCode::CanonWithoutSource => "attach provenance-bearing support to canonical claims",
        ViolationCode::AgreementWithoutChallenger => {
            "run a Challenger pass before reporting consensus"
        }
        ViolationCode::IdentityWithoutUncertainty => {
            "assign non-zero uncertainty to identity claims"
        }
        ViolationCode::ToolUnderTaint => "anchor every tainted claim before executing tools",
    }
}

/// Builds the repair plan for `violations`.
#[must_use]
pub fn repair_plan(violations: &[Violation]) -> Vec<RepairStep> {
    let mut seen = BTreeSet::new();
    violations
        .iter()
        .filter(|violation| seen.insert(violation.code))
        .map(|violation| RepairStep {
            code: violation.code,
            step: repair_step(violation.code).to_string(),
        })
        .collect()
}
