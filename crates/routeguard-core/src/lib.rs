// crates/routeguard-core/src/lib.rs
// ============================================================================
// Module: RouteGuard Core Library
// Description: Public API surface for the RouteGuard gate evaluation engine.
// Purpose: Expose claim, update, cycle, policy, and decision types plus `evaluate`.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! RouteGuard sits between an autonomous agent and its consequential actions:
//! memory commits, tool executions, and publications. [`evaluate`] runs an
//! ordered, deterministic gate pipeline over a structured request and returns
//! `ALLOW`, `DENY`, or `QUARANTINE` with violations and a repair plan.
//!
//! The core performs no I/O. Policy loading, request parsing, and audit
//! logging live in the config and CLI crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::DecayAction;
pub use runtime::DecayError;
pub use runtime::DecayResult;
pub use runtime::GoldenReport;
pub use runtime::GoldenSuite;
pub use runtime::OutputVerdict;
pub use runtime::TaintTracker;
pub use runtime::UpdateError;
pub use runtime::ValidatedUpdate;
pub use runtime::check_structured_output;
pub use runtime::decay;
pub use runtime::recheck_invariants;
pub use runtime::evaluate;
pub use runtime::run_golden;
pub use runtime::validate_update;
