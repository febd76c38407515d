// crates/routeguard-core/src/runtime/golden.rs
// ============================================================================
// Module: RouteGuard Golden Runner
// Description: Replays recorded decision requests against a policy.
// Purpose: Detect behavioral drift with named per-case expectation checks.
// Dependencies: crate::core, crate::runtime::pipeline, serde
// ============================================================================

//! ## Overview
//! A golden suite is a list of recorded cases, each with a request, the
//! evaluation time, and expectations. Every expectation present becomes one
//! named check; a case passes when all its checks pass. Runs are
//! deterministic because evaluation is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::decision::Decision;
use crate::core::decision::DecisionOutcome;
use crate::core::decision::DecisionRequest;
use crate::core::decision::GateName;
use crate::core::decision::ViolationCode;
use crate::core::identifiers::PolicyId;
use crate::core::policy::ValidatedPolicy;
use crate::core::time::Timestamp;
use crate::runtime::pipeline::evaluate;

// ============================================================================
// SECTION: Suite Types
// ============================================================================

/// Recorded golden suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenSuite {
    /// Optional suite label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<String>,
    /// Cases in replay order.
    pub cases: Vec<GoldenCase>,
}

/// One recorded case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenCase {
    /// Case identifier.
    pub case_id: String,
    /// Evaluation time.
    pub now: Timestamp,
    /// Request to replay.
    pub request: DecisionRequest,
    /// Expectations.
    #[serde(default)]
    pub expect: GoldenExpectation,
}

/// Expected properties of the decision; absent fields are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoldenExpectation {
    /// Expected outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionOutcome>,
    /// Expected violation code sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<ViolationCode>>,
    /// Expected last gate evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_gate: Option<GateName>,
    /// Text expected in some violation or gate detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_contains: Option<String>,
}

// ============================================================================
// SECTION: Report Types
// ============================================================================

/// Pass/fail status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoldenStatus {
    /// Every check passed.
    Pass,
    /// At least one check failed.
    Fail,
}

/// One named expectation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenCheck {
    /// Expectation name.
    pub name: String,
    /// Whether it held.
    pub ok: bool,
}

/// Result for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenCaseResult {
    /// Case identifier.
    pub case_id: String,
    /// Case status.
    pub status: GoldenStatus,
    /// Checks run.
    pub checks: Vec<GoldenCheck>,
    /// Decision produced.
    pub decision: Decision,
}

/// Suite report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenReport {
    /// Policy the suite ran against.
    pub policy_id: PolicyId,
    /// Number of cases.
    pub total: usize,
    /// Number of failing cases.
    pub failures: usize,
    /// Per-case results.
    pub results: Vec<GoldenCaseResult>,
}

impl GoldenReport {
    /// Returns true when every case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failures == 0
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Replays `suite` against `policy`.
#[must_use]
pub fn run_golden(suite: &GoldenSuite, policy: &ValidatedPolicy) -> GoldenReport {
    let results: Vec<GoldenCaseResult> =
        suite.cases.iter().map(|case| run_case(case, policy)).collect();
    let failures = results.iter().filter(|result| result.status == GoldenStatus::Fail).count();
    GoldenReport {
        policy_id: policy.policy_id().clone(),
        total: results.len(),
        failures,
        results,
    }
}

/// Evaluates one case and its checks.
fn run_case(case: &GoldenCase, policy: &ValidatedPolicy) -> GoldenCaseResult {
    let decision = evaluate(&case.request, policy, case.now);
    let expect = &case.expect;
    let mut checks = Vec::new();
    if let Some(outcome) = expect.decision {
        checks.push(check("decision", decision.decision == outcome));
    }
    if let Some(codes) = &expect.violations {
        checks.push(check("violations", &decision.violation_codes() == codes));
    }
    if let Some(gate) = expect.last_gate {
        checks.push(check("last_gate", decision.last_gate() == Some(gate)));
    }
    if let Some(needle) = &expect.detail_contains {
        let found = decision
            .violations
            .iter()
            .map(|violation| violation.detail.as_str())
            .chain(decision.gate_results.iter().map(|result| result.detail.as_str()))
            .any(|detail| detail.contains(needle.as_str()));
        checks.push(check("detail_contains", found));
    }
    let status =
        if checks.iter().all(|check| check.ok) { GoldenStatus::Pass } else { GoldenStatus::Fail };
    GoldenCaseResult {
        case_id: case.case_id.clone(),
        status,
        checks,
        decision,
    }
}

/// Builds a named check.
fn check(name: &str, ok: bool) -> GoldenCheck {
    GoldenCheck {
        name: name.to_string(),
        ok,
    }
}
