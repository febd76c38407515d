// crates/routeguard-cli/tests/verdict.rs
// ============================================================================
// Module: CLI Verdict Tests
// Description: Input classification, verdict lines, and exit statuses.
// Purpose: Ensure one input file maps to one verdict and the right exit code.
// ============================================================================

//! ## Overview
//! Drives [`evaluate_input`] with request documents, malformed requests, and
//! model output text, with and without an output schema, and checks the
//! rendered lines and exit statuses.

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

use std::path::Path;

use routeguard_cli::verdict::EXIT_ALLOW;
use routeguard_cli::verdict::EXIT_BLOCKED;
use routeguard_cli::verdict::Verdict;
use routeguard_cli::verdict::evaluate_input;
use routeguard_cli::verdict::golden_exit_status;
use routeguard_cli::verdict::render_golden;
use routeguard_config::OutputSchemaCheck;
use routeguard_config::load_output_schema;
use routeguard_core::DecisionOutcome;
use routeguard_core::GoldenSuite;
use routeguard_core::OutputSchema;
use routeguard_core::StructuredOutputPolicy;
use routeguard_core::ValidatedPolicy;
use routeguard_core::run_golden;
use serde_json::json;

use crate::common::NOW;
use crate::common::cli_policy;
use crate::common::lenient_policy;
use crate::common::tool_request;
use crate::common::verdict_for;

// ============================================================================
// SECTION: Request Documents
// ============================================================================

#[test]
fn allowed_request_renders_allow_line() {
    let verdict = verdict_for(&tool_request("tool.search"), &cli_policy());
    assert!(matches!(verdict, Verdict::Request(_)));
    assert_eq!(verdict.exit_status(), EXIT_ALLOW);
    assert_eq!(
        verdict.render_text(),
        vec!["ALLOW: tool.search passed 8 gates under policy policy-cli.".to_string()]
    );
}

#[test]
fn denied_request_renders_violations_and_repairs() {
    let verdict = verdict_for(&tool_request("tool.delete_repository"), &cli_policy());
    assert_eq!(verdict.outcome(), DecisionOutcome::Deny);
    assert_eq!(verdict.exit_status(), EXIT_BLOCKED);

    let lines = verdict.render_text();
    assert!(lines[0].starts_with("DENY: tool.delete_repository violated policy policy-cli: "));
    assert!(lines[0].contains("not on the allowlist"));
    assert_eq!(
        lines[1],
        "  repair TOOL_PERMISSION_DENIED: request allowlist addition or use an approved action"
    );
}

#[test]
fn quarantine_exits_blocked() {
    let mut verdict = verdict_for(&tool_request("tool.delete_repository"), &cli_policy());
    if let Verdict::Request(decision) = &mut verdict {
        decision.decision = DecisionOutcome::Quarantine;
    }
    assert_eq!(verdict.exit_status(), EXIT_BLOCKED);
    assert!(verdict.render_text()[0].starts_with("QUARANTINE: tool.delete_repository"));
}

#[test]
fn json_rendering_is_the_decision_document() {
    let verdict = verdict_for(&tool_request("tool.search"), &cli_policy());
    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["decision"], "ALLOW");
    assert_eq!(json["policy_id"], "policy-cli");
    assert_eq!(json["gate_results"].as_array().unwrap().len(), 8);
}

// ============================================================================
// SECTION: Malformed Requests
// ============================================================================

#[test]
fn misspelled_action_is_rejected_not_treated_as_output() {
    let text = r#"{"action": "TOOL_EXEC", "action_name": "tool.delete_everything",
        "context": {"tainted_context": true}}"#;
    let err = evaluate_input(text, &cli_policy(), None, NOW).unwrap_err();
    assert!(err.to_string().starts_with("malformed decision request:"));
    assert!(err.to_string().contains("TOOL_EXEC"));
}

#[test]
fn request_with_incomplete_claim_is_rejected() {
    let text = r#"{"action": "TOOL_EXECUTION", "action_name": "tool.search",
        "claims": [{"id": "x"}]}"#;
    assert!(evaluate_input(text, &cli_policy(), None, NOW).is_err());
}

#[test]
fn extracted_malformed_request_is_rejected() {
    let text = r#"Plan: {"action": "TOOL_EXEC", "action_name": "tool.search"} done"#;
    assert!(evaluate_input(text, &lenient_policy(), None, NOW).is_err());
}

// ============================================================================
// SECTION: Model Output
// ============================================================================

#[test]
fn chatty_output_is_denied_in_strict_mode() {
    let verdict = verdict_for("Sure! {\"a\": 1}", &cli_policy());
    assert!(matches!(verdict, Verdict::Output(_)));
    assert_eq!(verdict.exit_status(), EXIT_BLOCKED);
    assert_eq!(
        verdict.render_text(),
        vec![
            "DENY: Output violated RouteGuard policy: STRICT mode: output must be raw JSON only"
                .to_string()
        ]
    );
}

#[test]
fn plain_json_output_is_allowed() {
    let verdict = verdict_for("{\"summary\": \"done\"}", &cli_policy());
    assert!(matches!(verdict, Verdict::Output(_)));
    assert_eq!(verdict.exit_status(), EXIT_ALLOW);
    assert!(verdict.render_text()[0].starts_with("ALLOW: Output passed RouteGuard policy"));
}

#[test]
fn code_fenced_output_is_denied() {
    let verdict = verdict_for("```json\n{\"a\": 1}\n```", &lenient_policy());
    assert_eq!(verdict.outcome(), DecisionOutcome::Deny);
    assert!(verdict.render_text()[0].contains("code blocks"));
}

#[test]
fn extracted_request_is_evaluated_by_the_pipeline() {
    let text = format!("Here is my plan: {} Let me know.", tool_request("tool.delete_repository"));
    let verdict = verdict_for(&text, &lenient_policy());
    let Verdict::Request(decision) = verdict else {
        panic!("expected the extracted request to be evaluated");
    };
    assert_eq!(decision.decision, DecisionOutcome::Deny);
}

// ============================================================================
// SECTION: Output Schema
// ============================================================================

/// [`cli_policy`] whose output must carry a string `summary`.
fn schema_policy() -> ValidatedPolicy {
    let schema = json!({
        "type": "object",
        "required": ["summary"],
        "properties": {"summary": {"type": "string"}}
    });
    let mut policy = cli_policy().into_inner();
    policy.structured_output = Some(StructuredOutputPolicy {
        schema: Some(OutputSchema::Inline(schema.as_object().cloned().unwrap())),
        ..StructuredOutputPolicy::default()
    });
    policy.validate().unwrap()
}

/// Compiles the output schema of `policy`.
fn schema_check(policy: &ValidatedPolicy) -> OutputSchemaCheck {
    load_output_schema(policy, Path::new("routeguard-policy.json")).unwrap().unwrap()
}

#[test]
fn output_failing_schema_is_denied() {
    let policy = schema_policy();
    let check = schema_check(&policy);
    let verdict = evaluate_input("{\"status\": \"done\"}", &policy, Some(&check), NOW).unwrap();
    assert_eq!(verdict.exit_status(), EXIT_BLOCKED);
    assert!(verdict.render_text()[0].contains("schema validation failed"));
}

#[test]
fn output_matching_schema_reaches_output_gate() {
    let policy = schema_policy();
    let check = schema_check(&policy);
    let verdict =
        evaluate_input("{\"summary\": \"done\"}", &policy, Some(&check), NOW).unwrap();
    assert_eq!(verdict.exit_status(), EXIT_ALLOW);
}

#[test]
fn schema_requires_whole_output_as_json() {
    let policy = schema_policy();
    let check = schema_check(&policy);
    let verdict =
        evaluate_input("Sure! {\"summary\": \"done\"}", &policy, Some(&check), NOW).unwrap();
    assert!(verdict.render_text()[0].contains("output is not valid JSON"));
}

#[test]
fn requests_bypass_the_output_schema() {
    let policy = schema_policy();
    let check = schema_check(&policy);
    let verdict =
        evaluate_input(&tool_request("tool.search"), &policy, Some(&check), NOW).unwrap();
    assert!(matches!(verdict, Verdict::Request(_)));
    assert_eq!(verdict.exit_status(), EXIT_ALLOW);
}

// ============================================================================
// SECTION: Golden Suites
// ============================================================================

#[test]
fn golden_report_lists_cases_and_failed_checks() {
    let document = format!(
        r#"{{
  "suite_id": "cli",
  "cases": [
    {{"case_id": "allowed", "now": {{"kind": "unix_millis", "value": 1700000000000}},
      "request": {allowed}, "expect": {{"decision": "ALLOW"}}}},
    {{"case_id": "drift", "now": {{"kind": "unix_millis", "value": 1700000000000}},
      "request": {denied}, "expect": {{"decision": "ALLOW"}}}}
  ]
}}"#,
        allowed = tool_request("tool.search"),
        denied = tool_request("tool.delete_repository"),
    );
    let suite: GoldenSuite = serde_json::from_str(&document).unwrap();
    let report = run_golden(&suite, &cli_policy());

    assert_eq!(
        render_golden(&report),
        vec![
            "Golden tests: 2 | Failures: 1".to_string(),
            "- PASS: allowed".to_string(),
            "- FAIL: drift".to_string(),
            "    failed check: decision".to_string(),
        ]
    );
    assert_eq!(golden_exit_status(&report), EXIT_BLOCKED);
}
