// crates/routeguard-core/src/core/update.rs
// ============================================================================
// Module: RouteGuard Update Events
// Description: Audited, hash-chained mutation records produced by integrators.
// Purpose: Define the update event and audit trail consumed by the validator.
// Dependencies: crate::core::{claim, hashing, identifiers}, serde
// ============================================================================

//! ## Overview
//! An [`UpdateEvent`] describes one proposed mutation of a claim. It carries
//! the content hashes of the claim before and after the change, the claimed
//! post-state itself, and an append-only audit trail. Events are immutable
//! once created; the validator reads them and never applies them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::claim::ClaimRecord;
use crate::core::hashing::HashDigest;
use crate::core::identifiers::ClaimId;

// ============================================================================
// SECTION: Audit Trail
// ============================================================================

/// Kind of change recorded for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Field written with a new value.
    Write,
    /// Field removed.
    Delete,
    /// Earlier value explicitly retracted.
    Retract,
}

/// One entry of an update's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Field name the entry refers to.
    pub field: String,
    /// Reference to the value before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value_ref: Option<String>,
    /// Reference to the replacement value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value_ref: Option<String>,
    /// Change kind.
    pub action: AuditAction,
    /// Why the change was made; required for retractions that cover deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl AuditEntry {
    /// Returns true when the entry carries a non-blank rationale.
    #[must_use]
    pub fn has_rationale(&self) -> bool {
        self.rationale.as_deref().is_some_and(|value| !value.trim().is_empty())
    }

    /// Returns true when the entry names a non-blank replacement value.
    #[must_use]
    pub fn has_replacement(&self) -> bool {
        self.new_value_ref.as_deref().is_some_and(|value| !value.trim().is_empty())
    }
}

// ============================================================================
// SECTION: Update Event
// ============================================================================

/// Proposed mutation of a claim.
///
/// # Invariants
/// - `after_state_hash` must equal the canonical hash of `after_state`.
/// - `changed_fields` and the fields named in `audit_trail` must match exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Claim the update applies to.
    pub claim_id: ClaimId,
    /// Canonical hash of the claim before the change.
    pub before_state_hash: HashDigest,
    /// Canonical hash of the claim after the change.
    pub after_state_hash: HashDigest,
    /// Claimed post-state.
    pub after_state: ClaimRecord,
    /// Field names touched by the change.
    #[serde(default)]
    pub changed_fields: BTreeSet<String>,
    /// Author declaration that claim invariants still hold.
    pub invariants_preserved: bool,
    /// Signed change in uncertainty accompanying the update.
    #[serde(default)]
    pub uncertainty_delta: f64,
    /// Grounding reference justifying a confidence rise.
    #[serde(default)]
    pub justification: String,
    /// Ordered, append-only audit trail.
    #[serde(default)]
    pub audit_trail: Vec<AuditEntry>,
}

impl UpdateEvent {
    /// Returns the distinct field names referenced by the audit trail.
    #[must_use]
    pub fn audited_fields(&self) -> BTreeSet<&str> {
        self.audit_trail.iter().map(|entry| entry.field.as_str()).collect()
    }
}
