// crates/routeguard-core/src/runtime/output.rs
// ============================================================================
// Module: RouteGuard Structured Output Gate
// Description: Accept or reject raw model output as structured JSON.
// Purpose: Turn model output text into a JSON value under policy rules.
// Dependencies: crate::core::policy, serde, serde_json
// ============================================================================

//! ## Overview
//! Model output is checked in three steps:
//!
//! 1. fenced code blocks are rejected unless the policy allows them;
//! 2. `STRICT` requires the trimmed text to be exactly one JSON object;
//! 3. `LENIENT` accepts any parseable JSON, or the span between the first
//!    `{` and the last `}` when substring extraction is allowed.
//!
//! Accepted output carries the extracted JSON value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::decision::DecisionOutcome;
use crate::core::policy::OutputMode;
use crate::core::policy::StructuredOutputPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fence marking a markdown code block.
const CODE_FENCE: &str = "```";

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Result of the structured output gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputVerdict {
    /// `ALLOW` or `DENY`.
    pub decision: DecisionOutcome,
    /// Reason for the verdict.
    pub reason: String,
    /// Extracted JSON when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl OutputVerdict {
    /// Accepting verdict.
    fn allow(value: Value) -> Self {
        Self {
            decision: DecisionOutcome::Allow,
            reason: "structured output accepted under policy".to_string(),
            value: Some(value),
        }
    }

    /// Rejecting verdict.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            decision: DecisionOutcome::Deny,
            reason: reason.into(),
            value: None,
        }
    }

    /// Returns true when the output was accepted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.decision == DecisionOutcome::Allow
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Applies `policy` to raw model output `text`.
#[must_use]
pub fn check_structured_output(text: &str, policy: &StructuredOutputPolicy) -> OutputVerdict {
    let text = text.trim();
    if !policy.allow_codeblock && text.contains(CODE_FENCE) {
        return OutputVerdict::deny("code blocks are not allowed under this policy");
    }
    match policy.mode {
        OutputMode::Strict => {
            if !(text.starts_with('{') && text.ends_with('}')) {
                return OutputVerdict::deny("STRICT mode: output must be raw JSON only");
            }
            match serde_json::from_str::<Value>(text) {
                Ok(value) if value.is_object() => OutputVerdict::allow(value),
                _ => OutputVerdict::deny("STRICT mode: output must be a valid JSON object"),
            }
        }
        OutputMode::Lenient => {
            let extracted = serde_json::from_str::<Value>(text).ok().or_else(|| {
                policy.allow_substring_extraction.then(|| extract_object_span(text)).flatten()
            });
            extracted.map_or_else(
                || OutputVerdict::deny("LENIENT mode: could not extract valid JSON"),
                OutputVerdict::allow,
            )
        }
    }
}

/// Parses the span between the first `{` and the last `}`.
fn extract_object_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start ..= end]).ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Lenient policy with substring extraction enabled.
    const fn lenient() -> StructuredOutputPolicy {
        StructuredOutputPolicy {
            mode: OutputMode::Lenient,
            allow_codeblock: false,
            allow_substring_extraction: true,
            schema: None,
        }
    }

    #[test]
    fn strict_rejects_wrapped_json() {
        let verdict =
            check_structured_output("Sure! {\"a\": 1}", &StructuredOutputPolicy::default());
        assert!(!verdict.is_allowed());
        assert!(verdict.reason.contains("raw JSON"));
    }

    #[test]
    fn strict_accepts_bare_object() {
        let verdict =
            check_structured_output("  {\"a\": 1}\n", &StructuredOutputPolicy::default());
        assert!(verdict.is_allowed());
        assert_eq!(verdict.value, Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn codeblocks_denied_before_mode_rules() {
        let verdict = check_structured_output("```json\n{\"a\": 1}\n```", &lenient());
        assert!(!verdict.is_allowed());
        assert!(verdict.reason.contains("code blocks"));
    }

    #[test]
    fn lenient_extracts_embedded_object() {
        let verdict = check_structured_output("Here you go: {\"a\": [1, 2]} thanks", &lenient());
        assert_eq!(verdict.value, Some(serde_json::json!({"a": [1, 2]})));
    }

    #[test]
    fn lenient_without_extraction_rejects_prose() {
        let policy = StructuredOutputPolicy {
            allow_substring_extraction: false,
            ..lenient()
        };
        assert!(!check_structured_output("text {\"a\": 1}", &policy).is_allowed());
    }
}
