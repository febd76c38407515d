// crates/routeguard-core/tests/cycle.rs
// ============================================================================
// Module: Cycle State Machine Tests
// Description: Role ordering, required roles, and residual bookkeeping.
// Purpose: Ensure out-of-order cycles are rejected before any later gate.
// ============================================================================

//! ## Overview
//! Replays role sequences through the cycle stage machine and checks how
//! the pipeline reports ordering and role problems.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use routeguard_core::Cycle;
use routeguard_core::CycleError;
use routeguard_core::CycleStage;
use routeguard_core::IntegratorEntry;
use routeguard_core::Residual;
use routeguard_core::Role;
use routeguard_core::RoleEntry;
use routeguard_core::ViolationCode;
use routeguard_core::evaluate;

use crate::common::NOW;
use crate::common::anchor;
use crate::common::auditor;
use crate::common::challenger;
use crate::common::full_cycle;
use crate::common::integrator;
use crate::common::policy;
use crate::common::proposer;
use crate::common::valid_commit;

// ============================================================================
// SECTION: Stage Machine
// ============================================================================

#[test]
fn full_cycle_reaches_audited() {
    assert_eq!(full_cycle(&["c1"]).stage().unwrap(), CycleStage::Audited);
}

#[test]
fn empty_cycle_is_empty() {
    assert_eq!(Cycle::default().stage().unwrap(), CycleStage::Empty);
}

#[test]
fn repeated_challengers_are_accepted() {
    let cycle = Cycle::new(vec![proposer(&["c1"]), challenger(), challenger(), integrator()]);
    assert_eq!(cycle.stage().unwrap(), CycleStage::Integrated);
}

#[test]
fn anchor_may_follow_proposer_directly() {
    let cycle = Cycle::new(vec![proposer(&["c1"]), anchor(&["c1"])]);
    assert_eq!(cycle.stage().unwrap(), CycleStage::Anchored);
}

#[test]
fn integrator_before_proposer_is_out_of_order() {
    let err = Cycle::new(vec![integrator(), proposer(&["c1"])]).stage().unwrap_err();
    assert_eq!(
        err,
        CycleError::OutOfOrder {
            stage: CycleStage::Empty,
            role: Role::Integrator,
        }
    );
    assert_eq!(err.to_string(), "integrator entry not accepted at stage empty");
}

#[test]
fn challenger_after_anchor_is_out_of_order() {
    let err = Cycle::new(vec![proposer(&["c1"]), anchor(&["c1"]), challenger()])
        .stage()
        .unwrap_err();
    assert!(matches!(err, CycleError::OutOfOrder { stage: CycleStage::Anchored, .. }));
}

#[test]
fn auditor_requires_integrator() {
    let err = Cycle::new(vec![proposer(&["c1"]), challenger(), auditor(true)]).stage().unwrap_err();
    assert!(matches!(err, CycleError::OutOfOrder { role: Role::Auditor, .. }));
}

// ============================================================================
// SECTION: Residuals
// ============================================================================

#[test]
fn claim_scoped_residuals_match_only_their_claim() {
    let cycle = Cycle::new(vec![
        proposer(&["c1", "c2"]),
        RoleEntry::Integrator(IntegratorEntry {
            residuals: vec![Residual {
                claim_id: Some("c1".into()),
                description: "single witness".to_string(),
            }],
            consensus: false,
        }),
    ]);
    assert!(cycle.has_residual_for(&"c1".into()));
    assert!(!cycle.has_residual_for(&"c2".into()));
}

// ============================================================================
// SECTION: Pipeline Reporting
// ============================================================================

#[test]
fn out_of_order_cycle_stops_at_first_gate() {
    let mut request = valid_commit();
    request.cycle =
        Cycle::new(vec![challenger(), proposer(&["c1"]), integrator(), auditor(false)]);

    let decision = evaluate(&request, &policy(), NOW);

    assert_eq!(decision.violation_codes(), vec![ViolationCode::CycleOutOfOrder]);
    assert_eq!(decision.gate_results.len(), 1);
}

#[test]
fn cycle_roles_round_trip_through_json() {
    let cycle = full_cycle(&["c1"]);
    let json = serde_json::to_value(&cycle).unwrap();
    assert_eq!(json["entries"][0]["role"], "proposer");
    assert_eq!(json["entries"][2]["role"], "anchor");
    let back: Cycle = serde_json::from_value(json).unwrap();
    assert_eq!(back, cycle);
}
