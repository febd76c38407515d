// crates/routeguard-cli/tests/common/mod.rs
// ============================================================================
// Module: RouteGuard CLI Test Fixtures
// Description: Policies and request documents shared by CLI tests.
// Purpose: Keep CLI tests focused on rendering and exit behavior.
// ============================================================================

//! ## Overview
//! Request documents are written as JSON text, the way the CLI receives them.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]
#![allow(clippy::unwrap_used, reason = "Fixture policies are known to validate.")]

use routeguard_cli::verdict::Verdict;
use routeguard_cli::verdict::evaluate_input;
use routeguard_core::ActionName;
use routeguard_core::OutputMode;
use routeguard_core::Policy;
use routeguard_core::StructuredOutputPolicy;
use routeguard_core::Timestamp;
use routeguard_core::ValidatedPolicy;

/// Evaluation time used across tests.
pub const NOW: Timestamp = Timestamp::UnixMillis(1_700_000_000_000);

/// Evaluates `text` at [`NOW`] without an output schema.
pub fn verdict_for(text: &str, policy: &ValidatedPolicy) -> Verdict {
    evaluate_input(text, policy, None, NOW).unwrap()
}

/// Policy allowing `tool.search` with the default strict output gate.
pub fn cli_policy() -> ValidatedPolicy {
    let mut policy = Policy::new("policy-cli");
    policy.tools.allowlist = vec![ActionName::new("tool.search")];
    policy.validate().unwrap()
}

/// [`cli_policy`] with lenient output and substring extraction.
pub fn lenient_policy() -> ValidatedPolicy {
    let mut policy = cli_policy().into_inner();
    policy.structured_output = Some(StructuredOutputPolicy {
        mode: OutputMode::Lenient,
        allow_codeblock: false,
        allow_substring_extraction: true,
        schema: None,
    });
    policy.validate().unwrap()
}

/// Tool execution request document for `action_name`.
pub fn tool_request(action_name: &str) -> String {
    format!(
        r#"{{
  "action": "TOOL_EXECUTION",
  "action_name": "{action_name}",
  "context": {{"subject": "user:alice"}},
  "cycle": {{"entries": [
    {{"role": "proposer", "input_refs": ["input://fresh"]}},
    {{"role": "challenger", "objections": ["source may be stale"]}}
  ]}}
}}"#
    )
}
