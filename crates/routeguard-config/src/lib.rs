// crates/routeguard-config/src/lib.rs
// ============================================================================
// Module: RouteGuard Config Library
// Description: Policy file loading, schema, and canonical example.
// Purpose: Turn an on-disk policy document into a validated policy.
// Dependencies: jsonschema, routeguard-core, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! The config crate owns the only file I/O on the policy path. It resolves
//! the policy location, enforces size and path limits, decodes JSON or TOML,
//! and hands the document to [`routeguard_core::Policy::validate`]. It also
//! compiles the optional output schema a policy names.
//!
//! Security posture: policy files are untrusted input; loading fails closed
//! on oversize files, non-UTF-8 content, unknown fields, and invalid rules.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod examples;
pub mod loader;
pub mod output_schema;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use examples::policy_json_example;
pub use examples::policy_toml_example;
pub use loader::*;
pub use output_schema::OutputSchemaCheck;
pub use output_schema::load_output_schema;
pub use schema::policy_schema;
