// crates/routeguard-core/src/runtime/mod.rs
// ============================================================================
// Module: RouteGuard Runtime
// Description: Decay, validation, taint, gate pipeline, and replay helpers.
// Purpose: Implement the deterministic gate evaluation engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The runtime is pure: every function takes its inputs, including `now`,
//! explicitly and returns a fresh value. Nothing here performs I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decay;
pub mod gates;
pub mod golden;
pub mod output;
pub mod pipeline;
pub mod repair;
pub mod taint;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decay::DecayAction;
pub use decay::DecayError;
pub use decay::DecayResult;
pub use decay::decay;
pub use decay::decay_period;
pub use gates::GATES;
pub use gates::GateCheck;
pub use gates::GateContext;
pub use gates::GateDescriptor;
pub use gates::SeverityRule;
pub use golden::GoldenCase;
pub use golden::GoldenCaseResult;
pub use golden::GoldenExpectation;
pub use golden::GoldenReport;
pub use golden::GoldenStatus;
pub use golden::GoldenSuite;
pub use golden::run_golden;
pub use output::OutputVerdict;
pub use output::check_structured_output;
pub use pipeline::PipelineRun;
pub use pipeline::evaluate;
pub use pipeline::run_pipeline;
pub use repair::repair_plan;
pub use repair::repair_step;
pub use taint::TaintReason;
pub use taint::TaintTracker;
pub use validator::UpdateError;
pub use validator::ValidatedUpdate;
pub use validator::recheck_invariants;
pub use validator::validate_update;
