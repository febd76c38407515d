// crates/routeguard-core/src/core/policy.rs
// ============================================================================
// Module: RouteGuard Policy Model
// Description: Declarative rule set consumed by every evaluation call.
// Purpose: Define policy sections, defaults, and fail-closed validation.
// Dependencies: crate::core::{claim, decision, identifiers}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Policy`] is loaded, never computed. It names the tool allowlist and
//! forbidden list, sandbox and approval requirements, rate limits, decay
//! parameters, grounding thresholds, and per-action gate severities.
//!
//! Evaluation only accepts a [`ValidatedPolicy`], which can only be produced
//! by [`Policy::validate`]. An invalid policy therefore never reaches the
//! gate pipeline.
//!
//! Security posture: policy documents are untrusted input; validation is
//! strict and fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::claim::TtlClass;
use crate::core::decision::ActionKind;
use crate::core::identifiers::ActionName;
use crate::core::identifiers::PolicyId;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum entries in any policy list.
pub const MAX_POLICY_LIST_ENTRIES: usize = 4096;
/// Maximum length of a policy string entry.
pub const MAX_POLICY_STRING_LENGTH: usize = 256;
/// Maximum rate limit window (one day).
pub const MAX_RATE_LIMIT_WINDOW_MS: u64 = 86_400_000;
/// Maximum invocations permitted per rate limit window.
pub const MAX_RATE_LIMIT_INVOCATIONS: u32 = 1_000_000;
/// Seconds per day, used for default half-lives.
const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Policy content is invalid.
    #[error("invalid policy: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Policy Document
// ============================================================================

/// Declarative RouteGuard policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    /// Policy identifier recorded on every decision.
    pub policy_id: PolicyId,
    /// Policy document version.
    #[serde(default = "default_policy_version")]
    pub version: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Tool permission rules.
    #[serde(default)]
    pub tools: ToolPolicy,
    /// Agency-bearing namespaces.
    #[serde(default)]
    pub subjects: SubjectPolicy,
    /// Decay parameters.
    #[serde(default)]
    pub decay: DecayPolicy,
    /// Grounding thresholds.
    #[serde(default)]
    pub grounding: GroundingPolicy,
    /// Gate classification.
    #[serde(default)]
    pub gates: GatePolicy,
    /// Structured output rules for raw model output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<StructuredOutputPolicy>,
}

impl Policy {
    /// Creates a policy with default sections.
    #[must_use]
    pub fn new(policy_id: impl Into<PolicyId>) -> Self {
        Self {
            policy_id: policy_id.into(),
            version: default_policy_version(),
            notes: None,
            tools: ToolPolicy::default(),
            subjects: SubjectPolicy::default(),
            decay: DecayPolicy::default(),
            grounding: GroundingPolicy::default(),
            gates: GatePolicy::default(),
            structured_output: None,
        }
    }

    /// Validates the policy and returns an evaluable handle.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when any section is invalid.
    pub fn validate(self) -> Result<ValidatedPolicy, PolicyError> {
        if self.policy_id.as_str().trim().is_empty() {
            return Err(PolicyError::Invalid("policy_id must be non-empty".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(PolicyError::Invalid("version must be non-empty".to_string()));
        }
        self.tools.validate()?;
        self.subjects.validate()?;
        self.decay.validate()?;
        self.grounding.validate()?;
        self.gates.validate()?;
        if let Some(output) = &self.structured_output {
            output.validate()?;
        }
        Ok(ValidatedPolicy {
            policy: self,
        })
    }
}

/// Policy that passed validation.
///
/// # Invariants
/// - Only constructible through [`Policy::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPolicy {
    /// Validated policy content.
    policy: Policy,
}

impl ValidatedPolicy {
    /// Returns the validated policy.
    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Returns the policy identifier.
    #[must_use]
    pub const fn policy_id(&self) -> &PolicyId {
        &self.policy.policy_id
    }

    /// Consumes the handle and returns the policy.
    #[must_use]
    pub fn into_inner(self) -> Policy {
        self.policy
    }
}

// ============================================================================
// SECTION: Tool Policy
// ============================================================================

/// Tool permission rules applied by gate 7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolPolicy {
    /// Permitted actions; `ns.*` permits a whole namespace.
    #[serde(default)]
    pub allowlist: Vec<ActionName>,
    /// Actions that are always denied; takes precedence over the allowlist.
    #[serde(default)]
    pub forbidden: Vec<ActionName>,
    /// Sandbox requirement.
    #[serde(default)]
    pub sandbox: SandboxPolicy,
    /// Destructive calls must run as a dry run.
    #[serde(default = "default_true")]
    pub destructive_requires_dry_run: bool,
    /// Risk domains requiring a human approval marker.
    #[serde(default)]
    pub approval_domains: Vec<String>,
    /// Per-action rate limits.
    #[serde(default)]
    pub rate_limits: Vec<RateLimit>,
}

impl Default for ToolPolicy {
    fn default() -> Self {
        Self {
            allowlist: Vec::new(),
            forbidden: Vec::new(),
            sandbox: SandboxPolicy::default(),
            destructive_requires_dry_run: true,
            approval_domains: Vec::new(),
            rate_limits: Vec::new(),
        }
    }
}

impl ToolPolicy {
    /// Returns true when `name` is explicitly forbidden.
    #[must_use]
    pub fn is_forbidden(&self, name: &ActionName) -> bool {
        self.forbidden.iter().any(|pattern| action_matches(pattern, name))
    }

    /// Returns true when `name` is on the allowlist.
    #[must_use]
    pub fn is_allowlisted(&self, name: &ActionName) -> bool {
        self.allowlist.iter().any(|pattern| action_matches(pattern, name))
    }

    /// Returns the rate limit configured for `name`.
    #[must_use]
    pub fn rate_limit_for(&self, name: &ActionName) -> Option<&RateLimit> {
        self.rate_limits.iter().find(|limit| action_matches(&limit.action, name))
    }

    /// Validates tool rules.
    fn validate(&self) -> Result<(), PolicyError> {
        validate_action_list("tools.allowlist", &self.allowlist)?;
        validate_action_list("tools.forbidden", &self.forbidden)?;
        validate_string_list("tools.approval_domains", &self.approval_domains)?;
        self.sandbox.validate()?;
        if self.rate_limits.len() > MAX_POLICY_LIST_ENTRIES {
            return Err(PolicyError::Invalid("tools.rate_limits has too many entries".to_string()));
        }
        let mut seen = BTreeSet::new();
        for limit in &self.rate_limits {
            limit.validate()?;
            if !seen.insert(limit.action.as_str()) {
                return Err(PolicyError::Invalid(format!(
                    "tools.rate_limits has duplicate action {}",
                    limit.action
                )));
            }
        }
        Ok(())
    }
}

/// Sandbox requirement for tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SandboxPolicy {
    /// Tool calls must name an allowed sandbox profile.
    #[serde(default)]
    pub required: bool,
    /// Sandbox profiles accepted when required.
    #[serde(default)]
    pub allowed_profiles: Vec<String>,
}

impl SandboxPolicy {
    /// Validates sandbox settings.
    fn validate(&self) -> Result<(), PolicyError> {
        validate_string_list("tools.sandbox.allowed_profiles", &self.allowed_profiles)?;
        if self.required && self.allowed_profiles.is_empty() {
            return Err(PolicyError::Invalid(
                "tools.sandbox.allowed_profiles must be set when sandbox is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rate limit for one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimit {
    /// Action (or `ns.*` pattern) the limit applies to.
    pub action: ActionName,
    /// Invocations allowed inside the window, including the current one.
    pub max_invocations: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl RateLimit {
    /// Validates rate limit settings.
    fn validate(&self) -> Result<(), PolicyError> {
        validate_action_name("tools.rate_limits.action", &self.action)?;
        if self.max_invocations == 0 {
            return Err(PolicyError::Invalid(
                "rate_limit max_invocations must be greater than zero".to_string(),
            ));
        }
        if self.max_invocations > MAX_RATE_LIMIT_INVOCATIONS {
            return Err(PolicyError::Invalid("rate_limit max_invocations too large".to_string()));
        }
        if self.window_ms == 0 || self.window_ms > MAX_RATE_LIMIT_WINDOW_MS {
            return Err(PolicyError::Invalid(format!(
                "rate_limit window_ms must be between 1 and {MAX_RATE_LIMIT_WINDOW_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Subject Policy
// ============================================================================

/// Namespaces whose actions must carry an identified subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectPolicy {
    /// Agency-bearing namespaces.
    #[serde(default = "default_subject_namespaces")]
    pub namespaces: Vec<String>,
}

impl Default for SubjectPolicy {
    fn default() -> Self {
        Self {
            namespaces: default_subject_namespaces(),
        }
    }
}

impl SubjectPolicy {
    /// Returns true when actions in `namespace` require a subject.
    #[must_use]
    pub fn requires_subject(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|entry| entry == namespace)
    }

    /// Validates subject settings.
    fn validate(&self) -> Result<(), PolicyError> {
        validate_string_list("subjects.namespaces", &self.namespaces)?;
        if let Some(bad) = self.namespaces.iter().find(|ns| ns.contains('.')) {
            return Err(PolicyError::Invalid(format!(
                "subjects.namespaces entry {bad} must not contain '.'"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Decay Policy
// ============================================================================

/// Decay function applied to claim confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayModel {
    /// `c0 * exp(-lambda * t)` with `lambda = ln 2 / half_life`.
    #[default]
    Exponential,
    /// `c0 * max(0, 1 - t / ttl)`.
    Linear,
}

/// Half-life per TTL class, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HalfLives {
    /// LOW class half-life.
    #[serde(default = "default_low_half_life")]
    pub low_seconds: f64,
    /// MEDIUM class half-life.
    #[serde(default = "default_medium_half_life")]
    pub medium_seconds: f64,
    /// HIGH class half-life.
    #[serde(default = "default_high_half_life")]
    pub high_seconds: f64,
}

impl Default for HalfLives {
    fn default() -> Self {
        Self {
            low_seconds: default_low_half_life(),
            medium_seconds: default_medium_half_life(),
            high_seconds: default_high_half_life(),
        }
    }
}

impl HalfLives {
    /// Returns the half-life for `class`.
    #[must_use]
    pub const fn for_class(&self, class: TtlClass) -> f64 {
        match class {
            TtlClass::Low => self.low_seconds,
            TtlClass::Medium => self.medium_seconds,
            TtlClass::High => self.high_seconds,
        }
    }
}

/// Decay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecayPolicy {
    /// Decay function.
    #[serde(default)]
    pub model: DecayModel,
    /// Per-class half-lives.
    #[serde(default)]
    pub half_lives: HalfLives,
    /// Class applied when a claim names no decay parameters.
    #[serde(default = "default_ttl_class")]
    pub default_class: TtlClass,
    /// Effective confidence below which claims expire.
    #[serde(default = "default_expiry_floor")]
    pub expiry_floor: f64,
    /// Effective confidence below which canonical claims are demoted.
    #[serde(default = "default_canonical_floor")]
    pub canonical_floor: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            model: DecayModel::default(),
            half_lives: HalfLives::default(),
            default_class: default_ttl_class(),
            expiry_floor: default_expiry_floor(),
            canonical_floor: default_canonical_floor(),
        }
    }
}

impl DecayPolicy {
    /// Validates decay parameters.
    fn validate(&self) -> Result<(), PolicyError> {
        for (name, value) in [
            ("low_seconds", self.half_lives.low_seconds),
            ("medium_seconds", self.half_lives.medium_seconds),
            ("high_seconds", self.half_lives.high_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PolicyError::Invalid(format!(
                    "decay.half_lives.{name} must be a positive number"
                )));
            }
        }
        if !is_unit_interval(self.expiry_floor) {
            return Err(PolicyError::Invalid("decay.expiry_floor must be in [0, 1]".to_string()));
        }
        if !is_unit_interval(self.canonical_floor) {
            return Err(PolicyError::Invalid(
                "decay.canonical_floor must be in [0, 1]".to_string(),
            ));
        }
        if self.canonical_floor < self.expiry_floor {
            return Err(PolicyError::Invalid(
                "decay.canonical_floor must not be below decay.expiry_floor".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Grounding Policy
// ============================================================================

/// Thresholds for the Form-Measure grounding rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundingPolicy {
    /// Confidence increase above which grounding is required.
    #[serde(default)]
    pub confidence_rise_threshold: f64,
    /// Minimum justification length in characters.
    #[serde(default = "default_min_justification_chars")]
    pub min_justification_chars: usize,
}

impl Default for GroundingPolicy {
    fn default() -> Self {
        Self {
            confidence_rise_threshold: 0.0,
            min_justification_chars: default_min_justification_chars(),
        }
    }
}

impl GroundingPolicy {
    /// Validates grounding thresholds.
    fn validate(&self) -> Result<(), PolicyError> {
        if !is_unit_interval(self.confidence_rise_threshold) {
            return Err(PolicyError::Invalid(
                "grounding.confidence_rise_threshold must be in [0, 1]".to_string(),
            ));
        }
        if self.min_justification_chars == 0 {
            return Err(PolicyError::Invalid(
                "grounding.min_justification_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Gate Policy
// ============================================================================

/// How a configurable gate failure affects the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateSeverity {
    /// Deny and stop the pipeline.
    Hard,
    /// Record a violation, deny, and keep evaluating.
    Soft,
    /// Record a warning only.
    Warning,
}

/// Severity of one configurable gate per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeverityByAction {
    /// Severity for `MEMORY_COMMIT`.
    #[serde(default = "default_hard")]
    pub memory_commit: GateSeverity,
    /// Severity for `TOOL_EXECUTION`.
    #[serde(default = "default_hard")]
    pub tool_execution: GateSeverity,
    /// Severity for `PUBLICATION`.
    #[serde(default = "default_soft")]
    pub publication: GateSeverity,
}

impl Default for SeverityByAction {
    fn default() -> Self {
        Self {
            memory_commit: GateSeverity::Hard,
            tool_execution: GateSeverity::Hard,
            publication: GateSeverity::Soft,
        }
    }
}

impl SeverityByAction {
    /// Returns the severity for `action`.
    #[must_use]
    pub const fn for_action(&self, action: ActionKind) -> GateSeverity {
        match action {
            ActionKind::MemoryCommit => self.memory_commit,
            ActionKind::ToolExecution => self.tool_execution,
            ActionKind::Publication => self.publication,
        }
    }
}

/// Gate classification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatePolicy {
    /// Actions that require a challenger pass.
    #[serde(default = "default_high_impact_actions")]
    pub high_impact_actions: Vec<ActionKind>,
    /// Severity of gate 4 (`FALSIFICATION_ATTEMPTED`).
    #[serde(default)]
    pub falsification: SeverityByAction,
    /// Severity of gate 5 (`RESIDUALS_REPORTED`).
    #[serde(default)]
    pub residuals: SeverityByAction,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            high_impact_actions: default_high_impact_actions(),
            falsification: SeverityByAction::default(),
            residuals: SeverityByAction::default(),
        }
    }
}

impl GatePolicy {
    /// Returns true when `action` requires a challenger pass.
    #[must_use]
    pub fn is_high_impact(&self, action: ActionKind) -> bool {
        self.high_impact_actions.contains(&action)
    }

    /// Validates gate settings.
    fn validate(&self) -> Result<(), PolicyError> {
        let distinct: BTreeSet<_> = self.high_impact_actions.iter().collect();
        if distinct.len() != self.high_impact_actions.len() {
            return Err(PolicyError::Invalid(
                "gates.high_impact_actions has duplicate entries".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Structured Output Policy
// ============================================================================

/// Parsing strictness for raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputMode {
    /// Output must be exactly one JSON object.
    #[default]
    Strict,
    /// Output must contain extractable JSON.
    Lenient,
}

/// JSON Schema that raw model output must satisfy.
///
/// Files are resolved by the loader relative to the policy file; the core
/// never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputSchema {
    /// Path to a schema document.
    File(String),
    /// Schema document embedded in the policy.
    Inline(Map<String, Value>),
}

/// Rules applied to raw model output before it is treated as structured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredOutputPolicy {
    /// Parsing strictness.
    #[serde(default)]
    pub mode: OutputMode,
    /// Whether fenced code blocks are accepted.
    #[serde(default)]
    pub allow_codeblock: bool,
    /// Whether LENIENT mode may extract the outermost `{...}` span.
    #[serde(default)]
    pub allow_substring_extraction: bool,
    /// Schema checked against the whole output before the mode rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<OutputSchema>,
}

impl StructuredOutputPolicy {
    /// Validates the schema reference.
    fn validate(&self) -> Result<(), PolicyError> {
        match &self.schema {
            Some(OutputSchema::File(path)) if path.trim().is_empty() => Err(PolicyError::Invalid(
                "structured_output.schema path must be non-empty".to_string(),
            )),
            Some(OutputSchema::File(path)) if path.len() > MAX_POLICY_STRING_LENGTH => {
                Err(PolicyError::Invalid("structured_output.schema path is too long".to_string()))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `pattern` matches `name` exactly or as an `ns.*` glob.
fn action_matches(pattern: &ActionName, name: &ActionName) -> bool {
    let name = name.as_str().trim();
    match pattern.as_str().strip_suffix(".*") {
        Some(prefix) => name.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.')),
        None => pattern.as_str() == name,
    }
}

/// Returns true when `value` is a finite number in `[0, 1]`.
fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0 ..= 1.0).contains(&value)
}

/// Validates a list of action names.
fn validate_action_list(field: &str, names: &[ActionName]) -> Result<(), PolicyError> {
    if names.len() > MAX_POLICY_LIST_ENTRIES {
        return Err(PolicyError::Invalid(format!("{field} has too many entries")));
    }
    for name in names {
        validate_action_name(field, name)?;
    }
    Ok(())
}

/// Validates one action name.
fn validate_action_name(field: &str, name: &ActionName) -> Result<(), PolicyError> {
    let value = name.as_str();
    if value.trim().is_empty() || value.trim() != value {
        return Err(PolicyError::Invalid(format!("{field} entries must be non-empty and trimmed")));
    }
    if value.len() > MAX_POLICY_STRING_LENGTH {
        return Err(PolicyError::Invalid(format!("{field} entry {value} is too long")));
    }
    if value.split('.').any(str::is_empty) {
        return Err(PolicyError::Invalid(format!("{field} entry {value} has an empty segment")));
    }
    Ok(())
}

/// Validates a list of plain strings.
fn validate_string_list(field: &str, values: &[String]) -> Result<(), PolicyError> {
    if values.len() > MAX_POLICY_LIST_ENTRIES {
        return Err(PolicyError::Invalid(format!("{field} has too many entries")));
    }
    for value in values {
        if value.trim().is_empty() {
            return Err(PolicyError::Invalid(format!("{field} entries must be non-empty")));
        }
        if value.len() > MAX_POLICY_STRING_LENGTH {
            return Err(PolicyError::Invalid(format!("{field} entry {value} is too long")));
        }
    }
    let distinct: BTreeSet<_> = values.iter().collect();
    if distinct.len() != values.len() {
        return Err(PolicyError::Invalid(format!("{field} has duplicate entries")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default policy version.
fn default_policy_version() -> String {
    "1".to_string()
}

/// Default `true` flag.
const fn default_true() -> bool {
    true
}

/// Default agency-bearing namespaces.
fn default_subject_namespaces() -> Vec<String> {
    ["tool", "data", "exec", "network", "coordination"].into_iter().map(String::from).collect()
}

/// Default LOW half-life (30 days).
fn default_low_half_life() -> f64 {
    30.0 * SECONDS_PER_DAY
}

/// Default MEDIUM half-life (7 days).
fn default_medium_half_life() -> f64 {
    7.0 * SECONDS_PER_DAY
}

/// Default HIGH half-life (1 day).
const fn default_high_half_life() -> f64 {
    SECONDS_PER_DAY
}

/// Default TTL class.
const fn default_ttl_class() -> TtlClass {
    TtlClass::Medium
}

/// Default expiry floor.
const fn default_expiry_floor() -> f64 {
    0.05
}

/// Default canonical floor.
const fn default_canonical_floor() -> f64 {
    0.5
}

/// Default minimum justification length.
const fn default_min_justification_chars() -> usize {
    1
}

/// Default hard severity.
const fn default_hard() -> GateSeverity {
    GateSeverity::Hard
}

/// Default soft severity.
const fn default_soft() -> GateSeverity {
    GateSeverity::Soft
}

/// Default high-impact actions.
fn default_high_impact_actions() -> Vec<ActionKind> {
    vec![ActionKind::MemoryCommit, ActionKind::ToolExecution, ActionKind::Publication]
}
