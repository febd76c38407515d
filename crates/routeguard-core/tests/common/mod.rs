// crates/routeguard-core/tests/common/mod.rs
// ============================================================================
// Module: RouteGuard Core Test Fixtures
// Description: Shared builders for claims, cycles, updates, and policies.
// Purpose: Keep integration tests focused on the behavior under test.
// ============================================================================

//! ## Overview
//! Fixture builders for RouteGuard core integration tests. Every builder
//! returns a request that passes every gate unless the test changes it.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]
#![allow(clippy::unwrap_used, reason = "Fixtures hash deterministic values.")]

use std::collections::BTreeSet;

use routeguard_core::ActionKind;
use routeguard_core::ActionName;
use routeguard_core::AnchorEntry;
use routeguard_core::AuditAction;
use routeguard_core::AuditEntry;
use routeguard_core::AuditorEntry;
use routeguard_core::ChallengerEntry;
use routeguard_core::ClaimRecord;
use routeguard_core::ClaimSource;
use routeguard_core::Cycle;
use routeguard_core::DEFAULT_HASH_ALGORITHM;
use routeguard_core::DecisionRequest;
use routeguard_core::EvidenceRef;
use routeguard_core::IntegratorEntry;
use routeguard_core::Policy;
use routeguard_core::ProposerEntry;
use routeguard_core::Residual;
use routeguard_core::RoleEntry;
use routeguard_core::Timestamp;
use routeguard_core::UpdateEvent;
use routeguard_core::ValidatedPolicy;
use routeguard_core::hash_canonical_json;

/// Evaluation time used across tests.
pub const NOW: Timestamp = Timestamp::UnixMillis(1_700_000_000_000);

/// Unix millis of [`NOW`].
pub const NOW_MS: i64 = 1_700_000_000_000;

/// Policy with a small allowlist and one approval domain.
pub fn base_policy() -> Policy {
    let mut policy = Policy::new("policy-test");
    policy.tools.allowlist =
        vec![ActionName::new("tool.search"), ActionName::new("tool.send_email")];
    policy.tools.approval_domains = vec!["finance".to_string()];
    policy
}

/// Validates a policy fixture.
pub fn validated(policy: Policy) -> ValidatedPolicy {
    policy.validate().unwrap()
}

/// Validated [`base_policy`].
pub fn policy() -> ValidatedPolicy {
    validated(base_policy())
}

/// Provisional agent claim created one second before [`NOW`].
pub fn claim(id: &str) -> ClaimRecord {
    let mut claim = ClaimRecord::provisional(
        id,
        ClaimSource::Agent,
        Timestamp::UnixMillis(NOW_MS - 1_000),
        0.6,
        0.2,
    );
    claim.support.push(EvidenceRef::new(format!("doc://{id}"), "crawler"));
    claim
}

/// Proposer entry for `ids` drawing on one fresh input.
pub fn proposer(ids: &[&str]) -> RoleEntry {
    RoleEntry::Proposer(ProposerEntry {
        claim_ids: ids.iter().map(|id| (*id).into()).collect(),
        input_refs: vec!["input://fresh".to_string()],
        ..ProposerEntry::default()
    })
}

/// Challenger entry with one objection.
pub fn challenger() -> RoleEntry {
    RoleEntry::Challenger(ChallengerEntry {
        objections: vec!["source may be stale".to_string()],
    })
}

/// Anchor entry verifying `ids`.
pub fn anchor(ids: &[&str]) -> RoleEntry {
    RoleEntry::Anchor(AnchorEntry {
        grounding_refs: vec!["registry://lookup".to_string()],
        verified_claims: ids.iter().map(|id| (*id).into()).collect(),
    })
}

/// Integrator entry logging one residual.
pub fn integrator() -> RoleEntry {
    RoleEntry::Integrator(IntegratorEntry {
        residuals: vec![Residual {
            claim_id: None,
            description: "sample size is small".to_string(),
        }],
        consensus: false,
    })
}

/// Integrator entry logging nothing.
pub fn silent_integrator() -> RoleEntry {
    RoleEntry::Integrator(IntegratorEntry::default())
}

/// Auditor entry.
pub fn auditor(grounds_absent_residuals: bool) -> RoleEntry {
    RoleEntry::Auditor(AuditorEntry {
        grounds_absent_residuals,
        notes: None,
    })
}

/// Proposer, challenger, anchor, integrator, and auditor for `ids`.
pub fn full_cycle(ids: &[&str]) -> Cycle {
    Cycle::new(vec![proposer(ids), challenger(), anchor(ids), integrator(), auditor(false)])
}

/// Proposer, challenger, and integrator without an anchor.
pub fn unanchored_cycle(ids: &[&str]) -> Cycle {
    Cycle::new(vec![proposer(ids), challenger(), integrator()])
}

/// Update moving `before` to `after` with matching hashes, the measured
/// uncertainty change, and a full audit trail.
pub fn hashed_update(before: &ClaimRecord, after: ClaimRecord, fields: &[&str]) -> UpdateEvent {
    let before_state_hash = hash_canonical_json(DEFAULT_HASH_ALGORITHM, before).unwrap();
    let after_state_hash = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &after).unwrap();
    let changed_fields: BTreeSet<String> = fields.iter().map(|field| (*field).to_string()).collect();
    let uncertainty_delta = after.uncertainty - before.uncertainty;
    UpdateEvent {
        claim_id: before.id.clone(),
        before_state_hash,
        after_state_hash,
        after_state: after,
        audit_trail: changed_fields
            .iter()
            .map(|field| AuditEntry {
                field: field.clone(),
                old_value_ref: Some(format!("old://{field}")),
                new_value_ref: Some(format!("new://{field}")),
                action: AuditAction::Write,
                rationale: None,
            })
            .collect(),
        changed_fields,
        invariants_preserved: true,
        uncertainty_delta,
        justification: "calibration report 2024-11".to_string(),
    }
}

/// Update raising confidence of `before` to `confidence` with grounding.
pub fn grounded_rise(before: &ClaimRecord, confidence: f64) -> UpdateEvent {
    let mut after = before.clone();
    after.confidence = confidence;
    after.uncertainty = before.uncertainty - 0.05;
    hashed_update(before, after, &["confidence", "uncertainty"])
}

/// Memory commit of claim `c1` with a grounded update under a full cycle.
pub fn valid_commit() -> DecisionRequest {
    let before = claim("c1");
    let update = grounded_rise(&before, 0.7);
    let mut request = DecisionRequest::new(ActionKind::MemoryCommit);
    request.claims = vec![before];
    request.update_event = Some(update);
    request.cycle = full_cycle(&["c1"]);
    request
}

/// Tool execution of `name` with a subject, challenger, and no claims.
pub fn tool_call(name: &str) -> DecisionRequest {
    let mut request = DecisionRequest::new(ActionKind::ToolExecution);
    request.action_name = Some(ActionName::new(name));
    request.context.subject = Some("user:alice".to_string());
    request.cycle = Cycle::new(vec![proposer(&[]), challenger()]);
    request
}
