// crates/routeguard-core/tests/tool_permission.rs
// ============================================================================
// Module: Tool Permission Gate Tests
// Description: Allowlist, forbidden list, sandbox, dry-run, approval, rate limits.
// Purpose: Ensure tool executions run only inside the policy envelope.
// ============================================================================

//! ## Overview
//! Each test varies one tool-policy rule from an otherwise-allowed tool call
//! and checks the resulting `TOOL_PERMISSION_GATE` outcome.

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

use routeguard_core::ActionName;
use routeguard_core::ApprovalMarker;
use routeguard_core::Decision;
use routeguard_core::DecisionRequest;
use routeguard_core::GateName;
use routeguard_core::Policy;
use routeguard_core::RateLimit;
use routeguard_core::Timestamp;
use routeguard_core::ViolationCode;
use routeguard_core::evaluate;

use crate::common::NOW;
use crate::common::NOW_MS;
use crate::common::base_policy;
use crate::common::policy;
use crate::common::tool_call;
use crate::common::valid_commit;
use crate::common::validated;

/// Evaluates `request` under `policy`.
fn run(request: &DecisionRequest, policy: Policy) -> Decision {
    evaluate(request, &validated(policy), NOW)
}

/// Returns true when the decision was denied by the tool gate.
fn denied_by_tool_gate(decision: &Decision) -> bool {
    decision.last_gate() == Some(GateName::ToolPermissionGate)
        && decision.violation_codes().contains(&ViolationCode::ToolPermissionDenied)
}

/// Base policy with a rate limit on `tool.search`.
fn rate_limited(max_invocations: u32) -> Policy {
    let mut policy = base_policy();
    policy.tools.rate_limits = vec![RateLimit {
        action: ActionName::new("tool.search"),
        max_invocations,
        window_ms: 60_000,
    }];
    policy
}

// ============================================================================
// SECTION: Allowlist and Forbidden List
// ============================================================================

#[test]
fn namespace_glob_allows_members_only() {
    let mut glob = base_policy();
    glob.tools.allowlist = vec![ActionName::new("data.*")];

    assert!(run(&tool_call("data.read"), glob.clone()).is_allowed());
    let decision = run(&tool_call("database.read"), glob);
    assert!(denied_by_tool_gate(&decision));
    assert!(decision.violations[0].detail.contains("not on the allowlist"));
}

#[test]
fn forbidden_entries_override_the_allowlist() {
    let mut custom = base_policy();
    custom.tools.allowlist = vec![ActionName::new("tool.*")];
    custom.tools.forbidden = vec![ActionName::new("tool.delete_repo")];

    let decision = run(&tool_call("tool.delete_repo"), custom);

    assert!(denied_by_tool_gate(&decision));
    assert!(decision.violations[0].detail.contains("is forbidden"));
}

#[test]
fn surrounding_whitespace_in_action_names_is_ignored() {
    assert!(evaluate(&tool_call(" tool.search "), &policy(), NOW).is_allowed());
}

#[test]
fn non_tool_actions_skip_the_tool_gate() {
    let decision = evaluate(&valid_commit(), &policy(), NOW);
    assert_eq!(decision.gate_results[6].detail, "not a tool execution");
}

// ============================================================================
// SECTION: Execution Envelope
// ============================================================================

#[test]
fn required_sandbox_needs_allowed_profile() {
    let mut custom = base_policy();
    custom.tools.sandbox.required = true;
    custom.tools.sandbox.allowed_profiles = vec!["firejail".to_string()];

    let mut request = tool_call("tool.search");
    assert!(denied_by_tool_gate(&run(&request, custom.clone())));
    request.context.sandbox_profile = Some("docker-privileged".to_string());
    assert!(denied_by_tool_gate(&run(&request, custom.clone())));
    request.context.sandbox_profile = Some("firejail".to_string());
    assert!(run(&request, custom).is_allowed());
}

#[test]
fn destructive_calls_must_dry_run() {
    let mut request = tool_call("tool.send_email");
    request.context.destructive = true;
    assert!(denied_by_tool_gate(&run(&request, base_policy())));

    request.context.dry_run = true;
    assert!(run(&request, base_policy()).is_allowed());

    request.context.dry_run = false;
    let mut relaxed = base_policy();
    relaxed.tools.destructive_requires_dry_run = false;
    assert!(run(&request, relaxed).is_allowed());
}

#[test]
fn approval_domains_need_matching_human_approval() {
    let mut request = tool_call("tool.send_email");
    request.context.domain = Some("finance".to_string());
    let decision = run(&request, base_policy());
    assert!(denied_by_tool_gate(&decision));
    assert!(decision.violations[0].detail.contains("requires human approval"));

    request.context.human_approval = Some(ApprovalMarker {
        approver: "cfo@example.com".to_string(),
        domain: "legal".to_string(),
    });
    let decision = run(&request, base_policy());
    assert!(decision.violations[0].detail.contains("covers legal not finance"));

    request.context.human_approval = Some(ApprovalMarker {
        approver: "cfo@example.com".to_string(),
        domain: "finance".to_string(),
    });
    assert!(run(&request, base_policy()).is_allowed());
}

#[test]
fn domains_outside_policy_need_no_approval() {
    let mut request = tool_call("tool.send_email");
    request.context.domain = Some("marketing".to_string());
    assert!(run(&request, base_policy()).is_allowed());
}

#[test]
fn every_envelope_problem_is_reported() {
    let mut request = tool_call("tool.unknown");
    request.context.destructive = true;
    request.context.domain = Some("finance".to_string());

    let decision = run(&request, base_policy());

    assert_eq!(decision.violations.len(), 3);
    let plan = decision.repair_plan.unwrap();
    assert_eq!(plan.len(), 1);
}

// ============================================================================
// SECTION: Rate Limits
// ============================================================================

#[test]
fn rate_limit_counts_invocations_inside_window() {
    let mut request = tool_call("tool.search");
    request.context.recent_invocations =
        vec![Timestamp::UnixMillis(NOW_MS - 10_000), Timestamp::UnixMillis(NOW_MS - 30_000)];
    let decision = run(&request, rate_limited(2));
    assert!(denied_by_tool_gate(&decision));
    assert!(decision.violations[0].detail.contains("rate limit"));

    request.context.recent_invocations =
        vec![Timestamp::UnixMillis(NOW_MS - 10_000), Timestamp::UnixMillis(NOW_MS - 120_000)];
    assert!(run(&request, rate_limited(2)).is_allowed());
}

#[test]
fn invocations_on_another_clock_count_against_the_limit() {
    let mut request = tool_call("tool.search");
    request.context.recent_invocations = vec![Timestamp::Logical(7)];
    assert!(denied_by_tool_gate(&run(&request, rate_limited(1))));
}

#[test]
fn rate_limits_apply_only_to_their_action() {
    let mut request = tool_call("tool.send_email");
    request.context.recent_invocations = vec![Timestamp::UnixMillis(NOW_MS - 1_000)];
    assert!(run(&request, rate_limited(1)).is_allowed());
}
