// crates/routeguard-cli/src/lib.rs
// ============================================================================
// Module: RouteGuard CLI Library
// Description: Shared helpers behind the `routeguard` binary.
// Purpose: Keep verdict rendering, input handling, and audit sinks testable.
// Dependencies: routeguard-config, routeguard-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The binary in `main.rs` parses arguments and dispatches; everything it
//! renders or records lives here so integration tests can drive it without
//! spawning a process.

pub mod audit;
pub mod i18n;
pub mod input;
pub mod verdict;
