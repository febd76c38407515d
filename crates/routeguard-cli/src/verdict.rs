// crates/routeguard-cli/src/verdict.rs
// ============================================================================
// Module: CLI Verdicts
// Description: Evaluation of request files or model output, plus rendering.
// Purpose: Map one input document to one verdict line and an exit status.
// Dependencies: routeguard-config, routeguard-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An input document that is a JSON object with an `action` key is a
//! [`DecisionRequest`] and never falls through to the output path. Anything
//! else is raw model output: it is checked against the policy's output schema
//! when one is named, then passed through the structured output gate. When the
//! extracted JSON is itself a request, that request is evaluated by the gate
//! pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use routeguard_config::OutputSchemaCheck;
use routeguard_core::Decision;
use routeguard_core::DecisionOutcome;
use routeguard_core::DecisionRequest;
use routeguard_core::GoldenReport;
use routeguard_core::OutputVerdict;
use routeguard_core::Timestamp;
use routeguard_core::ValidatedPolicy;
use routeguard_core::Violation;
use routeguard_core::check_structured_output;
use routeguard_core::evaluate;
use routeguard_core::runtime::GoldenStatus;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::t;

// ============================================================================
// SECTION: Exit Status
// ============================================================================

/// Exit status for an `ALLOW` verdict or a passing golden suite.
pub const EXIT_ALLOW: u8 = 0;
/// Exit status for `DENY`, `QUARANTINE`, or a failing golden suite.
pub const EXIT_BLOCKED: u8 = 1;
/// Exit status for usage, input, and policy errors.
pub const EXIT_ERROR: u8 = 2;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of evaluating one input document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Verdict {
    /// The gate pipeline ran on a decision request.
    Request(Decision),
    /// The structured output gate rejected or accepted non-request output.
    Output(OutputVerdict),
}

impl Verdict {
    /// Returns the outcome.
    #[must_use]
    pub const fn outcome(&self) -> DecisionOutcome {
        match self {
            Self::Request(decision) => decision.decision,
            Self::Output(verdict) => verdict.decision,
        }
    }

    /// Returns the process exit status for this verdict.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self.outcome() {
            DecisionOutcome::Allow => EXIT_ALLOW,
            DecisionOutcome::Deny | DecisionOutcome::Quarantine => EXIT_BLOCKED,
        }
    }

    /// Renders the verdict line followed by indented detail lines.
    #[must_use]
    pub fn render_text(&self) -> Vec<String> {
        match self {
            Self::Request(decision) => render_decision(decision),
            Self::Output(verdict) => {
                let line = if verdict.is_allowed() {
                    t!("verdict.output_allow", reason = verdict.reason)
                } else {
                    t!("verdict.output_deny", reason = verdict.reason)
                };
                vec![line]
            }
        }
    }
}

/// Input that names an `action` but does not decode as a request.
#[derive(Debug, Error)]
#[error("malformed decision request: {0}")]
pub struct MalformedRequest(pub String);

/// Evaluates `text` as a decision request or as model output.
///
/// A JSON object carrying an `action` key is a request and must decode as
/// one. Other text passes the optional schema preflight, then the structured
/// output gate; an extracted request is evaluated like a direct one.
///
/// # Errors
///
/// Returns [`MalformedRequest`] when request-shaped input fails to decode.
pub fn evaluate_input(
    text: &str,
    policy: &ValidatedPolicy,
    schema: Option<&OutputSchemaCheck>,
    now: Timestamp,
) -> Result<Verdict, MalformedRequest> {
    let direct = serde_json::from_str::<Value>(text).ok();
    if direct.as_ref().is_some_and(is_request_shaped) {
        let request = serde_json::from_str::<DecisionRequest>(text)
            .map_err(|err| MalformedRequest(err.to_string()))?;
        return Ok(Verdict::Request(evaluate(&request, policy, now)));
    }
    if let Some(denied) = schema.and_then(|schema| schema.preflight(text)) {
        return Ok(Verdict::Output(denied));
    }
    let output_policy = policy.policy().structured_output.clone().unwrap_or_default();
    let checked = check_structured_output(text, &output_policy);
    match checked.value.as_ref().filter(|value| is_request_shaped(value)) {
        Some(value) => {
            let request = DecisionRequest::deserialize(value)
                .map_err(|err| MalformedRequest(err.to_string()))?;
            Ok(Verdict::Request(evaluate(&request, policy, now)))
        }
        None => Ok(Verdict::Output(checked)),
    }
}

/// Returns true for a JSON object with an `action` key.
fn is_request_shaped(value: &Value) -> bool {
    value.as_object().is_some_and(|object| object.contains_key("action"))
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a pipeline decision.
fn render_decision(decision: &Decision) -> Vec<String> {
    let action = decision
        .action_name
        .as_ref()
        .map_or_else(|| decision.action.to_string(), |name| name.as_str().to_string());
    let policy_id = decision.policy_id.as_str();
    let violations = summarize(&decision.violations);
    let mut lines = vec![match decision.decision {
        DecisionOutcome::Allow => t!(
            "verdict.allow",
            action = action,
            gates = decision.gate_results.len(),
            policy_id = policy_id
        ),
        DecisionOutcome::Deny => {
            t!("verdict.deny", action = action, policy_id = policy_id, violations = violations)
        }
        DecisionOutcome::Quarantine => t!(
            "verdict.quarantine",
            action = action,
            policy_id = policy_id,
            violations = violations
        ),
    }];
    for warning in &decision.warnings {
        lines.push(t!(
            "verdict.warning",
            code = warning.code,
            gate = warning.gate,
            detail = warning.detail
        ));
    }
    for step in decision.repair_plan.iter().flatten() {
        lines.push(t!("verdict.repair", code = step.code, step = step.step));
    }
    for record in &decision.transitions {
        lines.push(t!(
            "verdict.transition",
            claim_id = record.claim_id,
            from = record.from,
            to = record.to
        ));
    }
    lines
}

/// Joins violations as `CODE (detail)` pairs.
fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{} ({})", violation.code, violation.detail))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders a golden report summary with one line per case.
#[must_use]
pub fn render_golden(report: &GoldenReport) -> Vec<String> {
    let mut lines =
        vec![t!("golden.summary", total = report.total, failures = report.failures)];
    for result in &report.results {
        let status = match result.status {
            GoldenStatus::Pass => "PASS",
            GoldenStatus::Fail => "FAIL",
        };
        lines.push(t!("golden.case", status = status, case_id = result.case_id));
        for check in result.checks.iter().filter(|check| !check.ok) {
            lines.push(t!("golden.check_failed", check = check.name));
        }
    }
    lines
}

/// Returns the exit status for a golden report.
#[must_use]
pub const fn golden_exit_status(report: &GoldenReport) -> u8 {
    if report.passed() { EXIT_ALLOW } else { EXIT_BLOCKED }
}
