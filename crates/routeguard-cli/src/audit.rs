// crates/routeguard-cli/src/audit.rs
// ============================================================================
// Module: Decision Audit Logging
// Description: Structured audit events for every evaluation the CLI runs.
// Purpose: Emit JSON-lines audit records without a global logger.
// Dependencies: routeguard-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Each evaluation produces one [`DecisionAuditEvent`] with event name
//! `decision_audit`. Events go to a [`DecisionAuditSink`]: stderr, an
//! append-only file, both, or nowhere. Request content is never logged; the
//! canonical request hash stands in for it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use routeguard_core::ActionKind;
use routeguard_core::ActionName;
use routeguard_core::Decision;
use routeguard_core::DecisionOutcome;
use routeguard_core::HashDigest;
use routeguard_core::PolicyId;
use routeguard_core::ViolationCode;
use serde::Serialize;

use crate::verdict::Verdict;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event for one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Policy evaluated against.
    pub policy_id: PolicyId,
    /// `request` for pipeline decisions, `output` for structured output checks.
    pub source: &'static str,
    /// Action class, for pipeline decisions.
    pub action: Option<ActionKind>,
    /// Action name, when supplied.
    pub action_name: Option<ActionName>,
    /// Outcome.
    pub outcome: DecisionOutcome,
    /// Violation codes in gate order.
    pub violation_codes: Vec<ViolationCode>,
    /// Number of gates that ran.
    pub gates_evaluated: usize,
    /// Canonical request hash.
    pub request_hash: Option<HashDigest>,
}

impl DecisionAuditEvent {
    /// Builds an event for a pipeline decision.
    #[must_use]
    pub fn for_decision(decision: &Decision) -> Self {
        Self {
            event: "decision_audit",
            timestamp_ms: now_ms(),
            policy_id: decision.policy_id.clone(),
            source: "request",
            action: Some(decision.action),
            action_name: decision.action_name.clone(),
            outcome: decision.decision,
            violation_codes: decision.violation_codes(),
            gates_evaluated: decision.gate_results.len(),
            request_hash: decision.request_hash.clone(),
        }
    }

    /// Builds an event for a CLI verdict evaluated under `policy_id`.
    #[must_use]
    pub fn for_verdict(verdict: &Verdict, policy_id: &PolicyId) -> Self {
        match verdict {
            Verdict::Request(decision) => Self::for_decision(decision),
            Verdict::Output(output) => Self {
                event: "decision_audit",
                timestamp_ms: now_ms(),
                policy_id: policy_id.clone(),
                source: "output",
                action: None,
                action_name: None,
                outcome: output.decision,
                violation_codes: Vec::new(),
                gates_evaluated: 0,
                request_hash: None,
            },
        }
    }
}

/// Current wall-clock time in milliseconds.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for decision events.
pub trait DecisionAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &DecisionAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl DecisionAuditSink for StderrAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DecisionAuditSink for FileAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that forwards to several sinks in order.
pub struct FanoutAuditSink {
    /// Downstream sinks.
    sinks: Vec<Box<dyn DecisionAuditSink>>,
}

impl FanoutAuditSink {
    /// Creates a sink forwarding to `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn DecisionAuditSink>>) -> Self {
        Self {
            sinks,
        }
    }
}

impl DecisionAuditSink for FanoutAuditSink {
    fn record(&self, event: &DecisionAuditEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl DecisionAuditSink for NoopAuditSink {
    fn record(&self, _event: &DecisionAuditEvent) {}
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Builds the sink selected by the `--audit-log` and `--audit-stderr` flags.
///
/// # Errors
///
/// Returns an error if the audit log file cannot be opened.
pub fn select_sink(log_path: Option<&Path>, stderr: bool) -> io::Result<Box<dyn DecisionAuditSink>> {
    let mut sinks: Vec<Box<dyn DecisionAuditSink>> = Vec::new();
    if let Some(path) = log_path {
        sinks.push(Box::new(FileAuditSink::new(path)?));
    }
    if stderr {
        sinks.push(Box::new(StderrAuditSink));
    }
    Ok(match sinks.len() {
        0 => Box::new(NoopAuditSink),
        1 => sinks.remove(0),
        _ => Box::new(FanoutAuditSink::new(sinks)),
    })
}
