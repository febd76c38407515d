// crates/routeguard-config/src/examples.rs
// ============================================================================
// Module: Policy Examples
// Description: Canonical example policy documents.
// Purpose: Provide starting points that load and pass schema validation.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Example policies in JSON and TOML. Both describe the same rule set and are
//! kept loadable by the crate's tests.

/// Returns the canonical JSON example policy.
#[must_use]
pub fn policy_json_example() -> String {
    String::from(
        r#"{
  "policy_id": "routeguard-default",
  "version": "1",
  "notes": "Conservative defaults for a single agent deployment.",
  "tools": {
    "allowlist": ["tool.search", "tool.send_email", "data.*"],
    "forbidden": ["tool.delete_repository", "exec.shell"],
    "sandbox": {
      "required": true,
      "allowed_profiles": ["firejail", "gvisor"]
    },
    "destructive_requires_dry_run": true,
    "approval_domains": ["finance", "legal"],
    "rate_limits": [
      { "action": "tool.send_email", "max_invocations": 5, "window_ms": 60000 }
    ]
  },
  "subjects": {
    "namespaces": ["tool", "data", "exec", "network", "coordination"]
  },
  "decay": {
    "model": "exponential",
    "half_lives": {
      "low_seconds": 2592000,
      "medium_seconds": 604800,
      "high_seconds": 86400
    },
    "default_class": "MEDIUM",
    "expiry_floor": 0.05,
    "canonical_floor": 0.5
  },
  "grounding": {
    "confidence_rise_threshold": 0.0,
    "min_justification_chars": 12
  },
  "gates": {
    "high_impact_actions": ["MEMORY_COMMIT", "TOOL_EXECUTION", "PUBLICATION"],
    "falsification": {
      "memory_commit": "hard",
      "tool_execution": "hard",
      "publication": "soft"
    },
    "residuals": {
      "memory_commit": "hard",
      "tool_execution": "hard",
      "publication": "warning"
    }
  },
  "structured_output": {
    "mode": "STRICT",
    "allow_codeblock": false,
    "allow_substring_extraction": false
  }
}
"#,
    )
}

/// Returns the TOML rendition of the example policy.
#[must_use]
pub fn policy_toml_example() -> String {
    String::from(
        r#"policy_id = "routeguard-default"
version = "1"
notes = "Conservative defaults for a single agent deployment."

[tools]
allowlist = ["tool.search", "tool.send_email", "data.*"]
forbidden = ["tool.delete_repository", "exec.shell"]
destructive_requires_dry_run = true
approval_domains = ["finance", "legal"]

[tools.sandbox]
required = true
allowed_profiles = ["firejail", "gvisor"]

[[tools.rate_limits]]
action = "tool.send_email"
max_invocations = 5
window_ms = 60000

[subjects]
namespaces = ["tool", "data", "exec", "network", "coordination"]

[decay]
model = "exponential"
default_class = "MEDIUM"
expiry_floor = 0.05
canonical_floor = 0.5

[decay.half_lives]
low_seconds = 2592000.0
medium_seconds = 604800.0
high_seconds = 86400.0

[grounding]
confidence_rise_threshold = 0.0
min_justification_chars = 12

[gates]
high_impact_actions = ["MEMORY_COMMIT", "TOOL_EXECUTION", "PUBLICATION"]

[gates.falsification]
memory_commit = "hard"
tool_execution = "hard"
publication = "soft"

[gates.residuals]
memory_commit = "hard"
tool_execution = "hard"
publication = "warning"

[structured_output]
mode = "STRICT"
allow_codeblock = false
allow_substring_extraction = false
"#,
    )
}
