// crates/routeguard-config/src/schema.rs
// ============================================================================
// Module: Policy Schema
// Description: JSON Schema for RouteGuard policy documents.
// Purpose: Let authors and tooling check policies before loading them.
// Dependencies: routeguard-core, serde_json
// ============================================================================

//! ## Overview
//! [`policy_schema`] mirrors the serde shape of [`routeguard_core::Policy`].
//! Cross-field rules (floor ordering, duplicate rate limits, sandbox profiles
//! required when sandboxing is on) are enforced by validation, not here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use routeguard_core::core::policy::MAX_POLICY_LIST_ENTRIES;
use routeguard_core::core::policy::MAX_POLICY_STRING_LENGTH;
use routeguard_core::core::policy::MAX_RATE_LIMIT_INVOCATIONS;
use routeguard_core::core::policy::MAX_RATE_LIMIT_WINDOW_MS;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Dotted action name, optionally ending in a `.*` namespace glob.
const ACTION_NAME_PATTERN: &str = r"^[^.\s]+(\.[^.\s]+)*(\.\*)?$";
/// Single-segment subject namespace.
const NAMESPACE_PATTERN: &str = r"^[^.]+$";

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Returns the JSON Schema for policy documents.
#[must_use]
pub fn policy_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://routeguard.dev/schemas/policy.schema.json",
        "title": "RouteGuard Policy",
        "description": "Rule set consumed by the RouteGuard gate pipeline.",
        "type": "object",
        "required": ["policy_id"],
        "properties": {
            "policy_id": non_empty_string("Policy identifier echoed in every decision."),
            "version": {
                "type": "string",
                "default": "1",
                "description": "Policy document version."
            },
            "notes": {
                "type": "string",
                "description": "Free-form notes."
            },
            "tools": tools_schema(),
            "subjects": subjects_schema(),
            "decay": decay_schema(),
            "grounding": grounding_schema(),
            "gates": gates_schema(),
            "structured_output": structured_output_schema()
        },
        "additionalProperties": false
    })
}

/// Schema for the `tools` section.
fn tools_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "allowlist": action_list("Actions a tool execution may invoke."),
            "forbidden": action_list("Actions that are always denied."),
            "sandbox": {
                "type": "object",
                "properties": {
                    "required": { "type": "boolean", "default": false },
                    "allowed_profiles": string_list("Accepted sandbox profiles.")
                },
                "additionalProperties": false
            },
            "destructive_requires_dry_run": { "type": "boolean", "default": true },
            "approval_domains": string_list("Risk domains requiring human approval."),
            "rate_limits": {
                "type": "array",
                "maxItems": MAX_POLICY_LIST_ENTRIES,
                "items": rate_limit_schema()
            }
        },
        "additionalProperties": false
    })
}

/// Schema for one rate limit.
fn rate_limit_schema() -> Value {
    json!({
        "type": "object",
        "required": ["action", "max_invocations", "window_ms"],
        "properties": {
            "action": action_name(),
            "max_invocations": {
                "type": "integer",
                "minimum": 1,
                "maximum": MAX_RATE_LIMIT_INVOCATIONS
            },
            "window_ms": {
                "type": "integer",
                "minimum": 1,
                "maximum": MAX_RATE_LIMIT_WINDOW_MS
            }
        },
        "additionalProperties": false
    })
}

/// Schema for the `subjects` section.
fn subjects_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "namespaces": {
                "type": "array",
                "description": "Action namespaces whose actions need a subject.",
                "maxItems": MAX_POLICY_LIST_ENTRIES,
                "uniqueItems": true,
                "items": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": MAX_POLICY_STRING_LENGTH,
                    "pattern": NAMESPACE_PATTERN
                }
            }
        },
        "additionalProperties": false
    })
}

/// Schema for the `decay` section.
fn decay_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "model": { "enum": ["exponential", "linear"], "default": "exponential" },
            "half_lives": {
                "type": "object",
                "properties": {
                    "low_seconds": positive_number(),
                    "medium_seconds": positive_number(),
                    "high_seconds": positive_number()
                },
                "additionalProperties": false
            },
            "default_class": { "enum": ["LOW", "MEDIUM", "HIGH"], "default": "MEDIUM" },
            "expiry_floor": unit_interval(0.05),
            "canonical_floor": unit_interval(0.5)
        },
        "additionalProperties": false
    })
}

/// Schema for the `grounding` section.
fn grounding_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "confidence_rise_threshold": unit_interval(0.0),
            "min_justification_chars": { "type": "integer", "minimum": 1, "default": 1 }
        },
        "additionalProperties": false
    })
}

/// Schema for the `gates` section.
fn gates_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "high_impact_actions": {
                "type": "array",
                "uniqueItems": true,
                "items": { "enum": ["MEMORY_COMMIT", "TOOL_EXECUTION", "PUBLICATION"] }
            },
            "falsification": severity_by_action(),
            "residuals": severity_by_action()
        },
        "additionalProperties": false
    })
}

/// Schema for the optional `structured_output` section.
fn structured_output_schema() -> Value {
    json!({
        "oneOf": [
            { "type": "null" },
            {
                "type": "object",
                "properties": {
                    "mode": { "enum": ["STRICT", "LENIENT"], "default": "STRICT" },
                    "allow_codeblock": { "type": "boolean", "default": false },
                    "allow_substring_extraction": { "type": "boolean", "default": false },
                    "schema": {
                        "description": "Schema file path relative to the policy, or an inline schema.",
                        "oneOf": [
                            {
                                "type": "string",
                                "minLength": 1,
                                "maxLength": MAX_POLICY_STRING_LENGTH
                            },
                            { "type": "object" }
                        ]
                    }
                },
                "additionalProperties": false
            }
        ]
    })
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Per-action severity table.
fn severity_by_action() -> Value {
    let severity = json!({ "enum": ["hard", "soft", "warning"] });
    json!({
        "type": "object",
        "properties": {
            "memory_commit": severity,
            "tool_execution": severity,
            "publication": severity
        },
        "additionalProperties": false
    })
}

/// Single action name.
fn action_name() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": MAX_POLICY_STRING_LENGTH,
        "pattern": ACTION_NAME_PATTERN
    })
}

/// List of action names.
fn action_list(description: &str) -> Value {
    json!({
        "type": "array",
        "description": description,
        "maxItems": MAX_POLICY_LIST_ENTRIES,
        "items": action_name()
    })
}

/// List of unique non-empty strings.
fn string_list(description: &str) -> Value {
    json!({
        "type": "array",
        "description": description,
        "maxItems": MAX_POLICY_LIST_ENTRIES,
        "uniqueItems": true,
        "items": { "type": "string", "minLength": 1, "maxLength": MAX_POLICY_STRING_LENGTH }
    })
}

/// Non-empty string with a description.
fn non_empty_string(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": MAX_POLICY_STRING_LENGTH,
        "description": description
    })
}

/// Number strictly greater than zero.
fn positive_number() -> Value {
    json!({ "type": "number", "exclusiveMinimum": 0 })
}

/// Number in `[0, 1]` with a default.
fn unit_interval(default: f64) -> Value {
    json!({ "type": "number", "minimum": 0, "maximum": 1, "default": default })
}
