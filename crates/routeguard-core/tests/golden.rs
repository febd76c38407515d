// crates/routeguard-core/tests/golden.rs
// ============================================================================
// Module: Golden Runner Tests
// Description: Replay of recorded cases and expectation checks.
// Purpose: Ensure drift in decisions is reported case by case.
// ============================================================================

//! ## Overview
//! Builds golden suites from the reference scenarios and checks the
//! per-case status, named checks, and totals.

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

use routeguard_core::DecisionOutcome;
use routeguard_core::GateName;
use routeguard_core::GoldenSuite;
use routeguard_core::ViolationCode;
use routeguard_core::run_golden;
use routeguard_core::runtime::GoldenCase;
use routeguard_core::runtime::GoldenExpectation;
use routeguard_core::runtime::GoldenStatus;

use crate::common::NOW;
use crate::common::policy;
use crate::common::tool_call;
use crate::common::valid_commit;

/// Suite with one allowed commit and one denied tool call.
fn reference_suite() -> GoldenSuite {
    GoldenSuite {
        suite_id: Some("reference".to_string()),
        cases: vec![
            GoldenCase {
                case_id: "valid-commit".to_string(),
                now: NOW,
                request: valid_commit(),
                expect: GoldenExpectation {
                    decision: Some(DecisionOutcome::Allow),
                    violations: Some(Vec::new()),
                    last_gate: Some(GateName::NoForbiddenPractices),
                    detail_contains: None,
                },
            },
            GoldenCase {
                case_id: "unlisted-tool".to_string(),
                now: NOW,
                request: tool_call("tool.delete_repository"),
                expect: GoldenExpectation {
                    decision: Some(DecisionOutcome::Deny),
                    violations: Some(vec![ViolationCode::ToolPermissionDenied]),
                    last_gate: Some(GateName::ToolPermissionGate),
                    detail_contains: Some("not on the allowlist".to_string()),
                },
            },
        ],
    }
}

#[test]
fn reference_suite_passes() {
    let report = run_golden(&reference_suite(), &policy());
    assert!(report.passed());
    assert_eq!(report.total, 2);
    assert_eq!(report.failures, 0);
    assert_eq!(report.policy_id.as_str(), "policy-test");
    assert_eq!(report.results[1].checks.len(), 4);
}

#[test]
fn drifted_expectation_fails_only_its_check() {
    let mut suite = reference_suite();
    suite.cases[1].expect.decision = Some(DecisionOutcome::Quarantine);

    let report = run_golden(&suite, &policy());

    assert!(!report.passed());
    assert_eq!(report.failures, 1);
    let result = &report.results[1];
    assert_eq!(result.status, GoldenStatus::Fail);
    let failed: Vec<&str> =
        result.checks.iter().filter(|check| !check.ok).map(|check| check.name.as_str()).collect();
    assert_eq!(failed, vec!["decision"]);
    assert_eq!(result.decision.decision, DecisionOutcome::Deny);
}

#[test]
fn case_without_expectations_passes_vacuously() {
    let mut suite = reference_suite();
    suite.cases[0].expect = GoldenExpectation::default();
    let report = run_golden(&suite, &policy());
    assert_eq!(report.results[0].status, GoldenStatus::Pass);
    assert!(report.results[0].checks.is_empty());
}

#[test]
fn recorded_case_replays_from_json() {
    let mut suite = reference_suite();
    suite.cases.remove(0);
    let json = serde_json::to_string(&suite).unwrap();
    let parsed: GoldenSuite = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, suite);
    assert!(run_golden(&parsed, &policy()).passed());
}

#[test]
fn report_serializes_status_labels() {
    let report = run_golden(&reference_suite(), &policy());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["results"][0]["status"], "PASS");
    assert_eq!(json["results"][1]["decision"]["decision"], "DENY");
}
