// crates/routeguard-core/tests/determinism.rs
// ============================================================================
// Module: Evaluation Determinism Tests
// Description: Property tests for repeatable, side-effect free evaluation.
// Purpose: Detect hidden state or clock reads in the gate pipeline.
// ============================================================================

//! Property-based tests for evaluation determinism.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use proptest::prelude::*;
use routeguard_core::ActionKind;
use routeguard_core::DecisionRequest;
use routeguard_core::Timestamp;
use routeguard_core::evaluate;

use crate::common::NOW_MS;
use crate::common::claim;
use crate::common::full_cycle;
use crate::common::policy;
use crate::common::tool_call;
use crate::common::unanchored_cycle;

/// Builds a request from generated knobs.
fn generated_request(
    action: u8,
    confidence: f64,
    uncertainty: f64,
    tainted: bool,
    anchored: bool,
) -> DecisionRequest {
    let mut request = match action {
        0 => DecisionRequest::new(ActionKind::MemoryCommit),
        1 => DecisionRequest::new(ActionKind::Publication),
        _ => tool_call("tool.search"),
    };
    let mut record = claim("c1");
    record.confidence = confidence;
    record.uncertainty = uncertainty;
    request.claims = vec![record];
    request.context.tainted_context = tainted;
    request.cycle = if anchored { full_cycle(&["c1"]) } else { unanchored_cycle(&["c1"]) };
    request
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(
        action in 0u8 .. 3,
        confidence in -0.5f64 .. 1.5,
        uncertainty in 0.0f64 ..= 1.0,
        tainted in any::<bool>(),
        anchored in any::<bool>(),
        offset_ms in 0i64 .. 10_000_000_000,
    ) {
        let request = generated_request(action, confidence, uncertainty, tainted, anchored);
        let snapshot = request.clone();
        let policy = policy();
        let now = Timestamp::UnixMillis(NOW_MS + offset_ms);

        let first = evaluate(&request, &policy, now);
        let second = evaluate(&request, &policy, now);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&request, &snapshot);
        prop_assert!(first.request_hash.is_some());
    }

    #[test]
    fn repair_plan_present_iff_not_allowed(
        action in 0u8 .. 3,
        confidence in 0.0f64 ..= 1.0,
        tainted in any::<bool>(),
        anchored in any::<bool>(),
    ) {
        let request = generated_request(action, confidence, 0.2, tainted, anchored);
        let decision = evaluate(&request, &policy(), Timestamp::UnixMillis(NOW_MS));
        prop_assert_eq!(decision.repair_plan.is_some(), !decision.is_allowed());
        prop_assert_eq!(decision.violations.is_empty(), decision.is_allowed());
    }

    #[test]
    fn gate_results_follow_protocol_order(
        action in 0u8 .. 3,
        tainted in any::<bool>(),
        anchored in any::<bool>(),
    ) {
        let request = generated_request(action, 0.6, 0.2, tainted, anchored);
        let decision = evaluate(&request, &policy(), Timestamp::UnixMillis(NOW_MS));
        let numbers: Vec<u8> = decision.gate_results.iter().map(|result| result.gate.number()).collect();
        let expected: Vec<u8> = (1 ..= 8).take(numbers.len()).collect();
        prop_assert_eq!(numbers, expected);
    }
}
