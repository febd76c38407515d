// crates/routeguard-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Keyed user-facing strings with named placeholders.
// Purpose: Route every line the CLI prints through one catalog.
// Dependencies: std
// ============================================================================

//! ## Overview
//! User-facing strings live in [`CATALOG`] and are rendered with the
//! [`t!`](crate::t) macro. Missing keys render as the key itself so a typo
//! is visible rather than silent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted value substituted for the placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`].
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English message catalog.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "routeguard {version}"),
    ("main.missing_input", "Nothing to evaluate: pass --file <path> or a subcommand."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.not_utf8", "{kind} at {path} must be utf-8."),
    ("input.now_invalid", "Invalid --now value {value}: {error}"),
    ("input.request_rejected", "Rejected {path}: {error}"),
    ("input.kind.request", "request file"),
    ("input.kind.suite", "golden suite"),
    ("policy.load_failed", "Failed to load policy: {error}"),
    ("policy.schema_failed", "Failed to load output schema: {error}"),
    ("policy.valid", "Policy {policy_id} is valid."),
    ("verdict.allow", "ALLOW: {action} passed {gates} gates under policy {policy_id}."),
    ("verdict.deny", "DENY: {action} violated policy {policy_id}: {violations}"),
    (
        "verdict.quarantine",
        "QUARANTINE: {action} may be written but not promoted under policy {policy_id}: \
         {violations}",
    ),
    ("verdict.output_allow", "ALLOW: Output passed RouteGuard policy ({reason})."),
    ("verdict.output_deny", "DENY: Output violated RouteGuard policy: {reason}"),
    ("verdict.warning", "  warning: {code} at {gate}: {detail}"),
    ("verdict.repair", "  repair {code}: {step}"),
    ("verdict.transition", "  transition {claim_id}: {from} -> {to}"),
    ("golden.parse_failed", "Failed to parse golden suite {path}: {error}"),
    ("golden.summary", "Golden tests: {total} | Failures: {failures}"),
    ("golden.case", "- {status}: {case_id}"),
    ("golden.check_failed", "    failed check: {check}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
];

/// Returns the catalog as a lookup map.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

/// Returns true when `key` has a catalog entry.
#[must_use]
pub fn has_key(key: &str) -> bool {
    catalog().contains_key(key)
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` with `args` substituted into `{placeholder}` positions.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
