// crates/routeguard-core/src/core/mod.rs
// ============================================================================
// Module: RouteGuard Core Types
// Description: Claims, updates, cycles, requests, decisions, and policy.
// Purpose: Provide stable, serializable types for the gate evaluation engine.
// Dependencies: serde, serde_jcs, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! RouteGuard core types are the request/response contract of the gate
//! evaluation engine. They are plain data with pure helper methods; all
//! evaluation logic lives in [`crate::runtime`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod claim;
pub mod cycle;
pub mod decision;
pub mod hashing;
pub mod identifiers;
pub mod policy;
pub mod time;
pub mod update;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claim::CanonicalReadiness;
pub use claim::ClaimError;
pub use claim::ClaimKind;
pub use claim::ClaimRecord;
pub use claim::ClaimSource;
pub use claim::ClaimStatus;
pub use claim::ClaimTransition;
pub use claim::EvidenceRef;
pub use claim::Reinforcement;
pub use claim::TtlClass;
pub use cycle::AnchorEntry;
pub use cycle::AuditorEntry;
pub use cycle::ChallengerEntry;
pub use cycle::Cycle;
pub use cycle::CycleError;
pub use cycle::CycleStage;
pub use cycle::IntegratorEntry;
pub use cycle::ProposalMode;
pub use cycle::ProposerEntry;
pub use cycle::Residual;
pub use cycle::Role;
pub use cycle::RoleEntry;
pub use decision::ActionKind;
pub use decision::ApprovalMarker;
pub use decision::ClaimTransitionRecord;
pub use decision::Decision;
pub use decision::DecisionOutcome;
pub use decision::DecisionRequest;
pub use decision::GateName;
pub use decision::GateResult;
pub use decision::InputSource;
pub use decision::RepairStep;
pub use decision::RequestContext;
pub use decision::SourceTrust;
pub use decision::Violation;
pub use decision::ViolationCode;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::hash_canonical_json;
pub use identifiers::ActionName;
pub use identifiers::ClaimId;
pub use identifiers::PolicyId;
pub use policy::DecayModel;
pub use policy::DecayPolicy;
pub use policy::GatePolicy;
pub use policy::GateSeverity;
pub use policy::GroundingPolicy;
pub use policy::HalfLives;
pub use policy::OutputMode;
pub use policy::OutputSchema;
pub use policy::Policy;
pub use policy::PolicyError;
pub use policy::RateLimit;
pub use policy::SandboxPolicy;
pub use policy::SeverityByAction;
pub use policy::StructuredOutputPolicy;
pub use policy::SubjectPolicy;
pub use policy::ToolPolicy;
pub use policy::ValidatedPolicy;
pub use time::TimeError;
pub use time::Timestamp;
pub use update::AuditAction;
pub use update::AuditEntry;
pub use update::UpdateEvent;
