// crates/routeguard-config/src/output_schema.rs
// ============================================================================
// Module: Output Schema Preflight
// Description: JSON Schema check of raw model output named by the policy.
// Purpose: Reject output that breaks the policy schema before the output gate.
// Dependencies: jsonschema, routeguard-core, serde_json
// ============================================================================

//! ## Overview
//! `structured_output.schema` names a schema file (relative to the policy
//! file) or embeds one. [`load_output_schema`] reads and compiles it once;
//! [`OutputSchemaCheck::preflight`] then parses the whole output as JSON and
//! validates it. A schema file that does not exist denies every output
//! rather than failing the load, so a missing file never silently disables
//! the check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::path::Path;

use jsonschema::Draft;
use jsonschema::Validator;
use routeguard_core::OutputSchema;
use routeguard_core::OutputVerdict;
use routeguard_core::ValidatedPolicy;
use serde_json::Value;

use crate::loader::BoundedRead;
use crate::loader::ConfigError;
use crate::loader::read_bounded;
use crate::loader::validate_path;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum output schema file size in bytes.
pub const MAX_SCHEMA_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Preflight
// ============================================================================

/// Compiled schema state.
enum SchemaState {
    /// Schema compiled and ready.
    Ready(Box<Validator>),
    /// Named schema file does not exist.
    Missing(String),
}

/// Schema check applied to raw model output.
pub struct OutputSchemaCheck {
    /// Compiled schema or the missing file name.
    state: SchemaState,
}

impl OutputSchemaCheck {
    /// Returns a `DENY` verdict when `text` fails the schema, else `None`.
    #[must_use]
    pub fn preflight(&self, text: &str) -> Option<OutputVerdict> {
        let validator = match &self.state {
            SchemaState::Ready(validator) => validator,
            SchemaState::Missing(path) => {
                return Some(OutputVerdict::deny(format!("schema file missing: {path}")));
            }
        };
        let instance: Value = match serde_json::from_str(text.trim()) {
            Ok(instance) => instance,
            Err(err) => {
                return Some(OutputVerdict::deny(format!(
                    "output is not valid JSON (required by schema validation): {err}"
                )));
            }
        };
        let messages: Vec<String> =
            validator.iter_errors(&instance).map(|err| err.to_string()).collect();
        if messages.is_empty() {
            return None;
        }
        Some(OutputVerdict::deny(format!("schema validation failed: {}", messages.join("; "))))
    }

    /// Returns true when the named schema file was not found.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self.state, SchemaState::Missing(_))
    }
}

/// Loads the output schema named by `policy`, resolving files next to
/// `policy_path`. Returns `None` when the policy names no schema.
///
/// # Errors
///
/// Returns [`ConfigError`] when the schema file cannot be read, exceeds
/// [`MAX_SCHEMA_FILE_SIZE`], is not UTF-8 JSON, or does not compile.
pub fn load_output_schema(
    policy: &ValidatedPolicy,
    policy_path: &Path,
) -> Result<Option<OutputSchemaCheck>, ConfigError> {
    let Some(schema) =
        policy.policy().structured_output.as_ref().and_then(|output| output.schema.as_ref())
    else {
        return Ok(None);
    };
    let state = match schema {
        OutputSchema::Inline(document) => compile(&Value::Object(document.clone()))?,
        OutputSchema::File(name) => {
            let base = policy_path.parent().unwrap_or_else(|| Path::new(""));
            let path = base.join(name);
            validate_path(&path)?;
            match read_bounded(&path, MAX_SCHEMA_FILE_SIZE) {
                Ok(BoundedRead::Complete(bytes)) => compile(&decode(&bytes, &path)?)?,
                Ok(BoundedRead::TooLarge) => {
                    return Err(ConfigError::Invalid(format!(
                        "output schema {} exceeds size limit",
                        path.display()
                    )));
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    SchemaState::Missing(path.display().to_string())
                }
                Err(err) => return Err(ConfigError::Io(err.to_string())),
            }
        }
    };
    Ok(Some(OutputSchemaCheck {
        state,
    }))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes schema file bytes as UTF-8 JSON.
fn decode(bytes: &[u8], path: &Path) -> Result<Value, ConfigError> {
    let content = std::str::from_utf8(bytes).map_err(|_| {
        ConfigError::Invalid(format!("output schema {} must be utf-8", path.display()))
    })?;
    serde_json::from_str(content).map_err(|err| {
        ConfigError::Parse(format!("output schema {}: {err}", path.display()))
    })
}

/// Compiles a schema document.
fn compile(schema: &Value) -> Result<SchemaState, ConfigError> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map(|validator| SchemaState::Ready(Box::new(validator)))
        .map_err(|err| ConfigError::Invalid(format!("invalid output schema: {err}")))
}
