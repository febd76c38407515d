// crates/routeguard-core/tests/decay.rs
// ============================================================================
// Module: Decay Engine Tests
// Description: Decay models, period precedence, and lifecycle recommendations.
// Purpose: Pin decay arithmetic and its purity across wide input ranges.
// ============================================================================

//! ## Overview
//! Property tests for decay purity and bounds, plus targeted checks for the
//! linear model, canonical demotion, expiry, and clock handling.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::f64::consts::LN_2;

use proptest::prelude::*;
use routeguard_core::ClaimRecord;
use routeguard_core::ClaimSource;
use routeguard_core::ClaimStatus;
use routeguard_core::DecayAction;
use routeguard_core::DecayError;
use routeguard_core::DecayModel;
use routeguard_core::DecayPolicy;
use routeguard_core::EvidenceRef;
use routeguard_core::Reinforcement;
use routeguard_core::Timestamp;
use routeguard_core::TtlClass;
use routeguard_core::decay;
use routeguard_core::runtime::decay_period;

use crate::common::claim;

const HOUR_MS: i64 = 3_600_000;

/// Claim created at unix millis zero with a one hour decay period.
fn hourly(confidence: f64, uncertainty: f64) -> ClaimRecord {
    let mut claim = ClaimRecord::provisional(
        "c-hourly",
        ClaimSource::Agent,
        Timestamp::UnixMillis(0),
        confidence,
        uncertainty,
    );
    claim.ttl_seconds = Some(3_600.0);
    claim
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn decay_is_pure_and_repeatable(
        confidence in 0.0f64 ..= 1.0,
        uncertainty in 0.0f64 ..= 1.0,
        elapsed_ms in 0i64 .. 1_000_000_000,
    ) {
        let claim = hourly(confidence, uncertainty);
        let snapshot = claim.clone();
        let policy = DecayPolicy::default();
        let first = decay(&claim, Timestamp::UnixMillis(elapsed_ms), &policy).unwrap();
        let second = decay(&claim, Timestamp::UnixMillis(elapsed_ms), &policy).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(claim, snapshot);
    }

    #[test]
    fn decay_stays_within_bounds(
        confidence in 0.0f64 ..= 1.0,
        uncertainty in 0.0f64 ..= 1.0,
        elapsed_ms in 0i64 .. 1_000_000_000,
        linear in any::<bool>(),
    ) {
        let claim = hourly(confidence, uncertainty);
        let policy = DecayPolicy {
            model: if linear { DecayModel::Linear } else { DecayModel::Exponential },
            ..DecayPolicy::default()
        };
        let result = decay(&claim, Timestamp::UnixMillis(elapsed_ms), &policy).unwrap();
        prop_assert!(result.effective_confidence >= 0.0);
        prop_assert!(result.effective_confidence <= confidence);
        prop_assert!(result.effective_uncertainty >= uncertainty);
        prop_assert!(result.effective_uncertainty <= 1.0);
    }

    #[test]
    fn decay_never_increases_with_time(
        confidence in 0.0f64 ..= 1.0,
        earlier in 0i64 .. 500_000_000,
        gap in 0i64 .. 500_000_000,
    ) {
        let claim = hourly(confidence, 0.1);
        let policy = DecayPolicy::default();
        let first = decay(&claim, Timestamp::UnixMillis(earlier), &policy).unwrap();
        let later = decay(&claim, Timestamp::UnixMillis(earlier + gap), &policy).unwrap();
        prop_assert!(later.effective_confidence <= first.effective_confidence);
    }
}

// ============================================================================
// SECTION: Models and Periods
// ============================================================================

#[test]
fn linear_model_reaches_zero_at_full_lifetime() {
    let policy = DecayPolicy {
        model: DecayModel::Linear,
        ..DecayPolicy::default()
    };
    let claim = hourly(0.8, 0.1);
    let half = decay(&claim, Timestamp::UnixMillis(HOUR_MS / 2), &policy).unwrap();
    assert!((half.effective_confidence - 0.4).abs() < 1e-12);
    let full = decay(&claim, Timestamp::UnixMillis(HOUR_MS * 2), &policy).unwrap();
    assert!(full.effective_confidence.abs() < f64::EPSILON);
    assert!((full.effective_uncertainty - 0.9).abs() < 1e-12);
    assert_eq!(full.action, DecayAction::Expire);
}

#[test]
fn decay_rate_converts_to_half_life() {
    let mut claim = hourly(0.8, 0.1);
    claim.ttl_seconds = None;
    claim.decay_rate = Some(LN_2 / 60.0);
    let period = decay_period(&claim, &DecayPolicy::default()).unwrap();
    assert!((period - 60.0).abs() < 1e-9);
}

#[test]
fn class_and_default_class_resolve_from_policy() {
    let policy = DecayPolicy::default();
    let mut claim = hourly(0.8, 0.1);
    claim.ttl_seconds = None;
    assert_eq!(decay_period(&claim, &policy).unwrap(), policy.half_lives.medium_seconds);
    claim.ttl_class = Some(TtlClass::High);
    assert_eq!(decay_period(&claim, &policy).unwrap(), policy.half_lives.high_seconds);
}

#[test]
fn non_positive_parameters_are_rejected() {
    let mut claim = hourly(0.8, 0.1);
    claim.ttl_seconds = Some(0.0);
    assert!(matches!(
        decay_period(&claim, &DecayPolicy::default()),
        Err(DecayError::InvalidParameter { field: "ttl_seconds", .. })
    ));
    claim.ttl_seconds = None;
    claim.decay_rate = Some(f64::NAN);
    assert!(matches!(
        decay_period(&claim, &DecayPolicy::default()),
        Err(DecayError::InvalidParameter { field: "decay_rate", .. })
    ));
}

// ============================================================================
// SECTION: Recommendations
// ============================================================================

#[test]
fn canonical_claim_below_floor_is_demoted() {
    let mut claim = hourly(0.8, 0.1);
    claim.status = ClaimStatus::Canonical;
    let result = decay(&claim, Timestamp::UnixMillis(2 * HOUR_MS), &DecayPolicy::default()).unwrap();
    assert!((result.effective_confidence - 0.2).abs() < 1e-12);
    assert_eq!(result.action, DecayAction::Demote);
}

#[test]
fn canonical_claim_above_floor_is_retained() {
    let mut claim = hourly(0.8, 0.1);
    claim.status = ClaimStatus::Canonical;
    let result = decay(&claim, Timestamp::UnixMillis(HOUR_MS / 4), &DecayPolicy::default()).unwrap();
    assert_eq!(result.action, DecayAction::Retain);
}

#[test]
fn provisional_claim_below_expiry_floor_expires() {
    let claim = hourly(0.6, 0.1);
    let result =
        decay(&claim, Timestamp::UnixMillis(10 * HOUR_MS), &DecayPolicy::default()).unwrap();
    assert_eq!(result.action, DecayAction::Expire);
}

#[test]
fn expired_claim_is_left_alone() {
    let mut claim = hourly(0.6, 0.1);
    claim.status = ClaimStatus::Expired;
    let result =
        decay(&claim, Timestamp::UnixMillis(10 * HOUR_MS), &DecayPolicy::default()).unwrap();
    assert_eq!(result.action, DecayAction::Retain);
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

#[test]
fn mixed_clocks_are_incomparable() {
    let err = decay(&claim("c1"), Timestamp::Logical(10), &DecayPolicy::default()).unwrap_err();
    assert_eq!(err, DecayError::IncomparableTimestamps("c1".into()));
}

#[test]
fn logical_clock_counts_ticks_as_seconds() {
    let mut claim =
        ClaimRecord::provisional("c-logical", ClaimSource::Agent, Timestamp::Logical(0), 0.8, 0.0);
    claim.ttl_seconds = Some(10.0);
    let result = decay(&claim, Timestamp::Logical(10), &DecayPolicy::default()).unwrap();
    assert!((result.effective_confidence - 0.4).abs() < 1e-12);
}

#[test]
fn reinforcement_restarts_the_decay_clock() {
    let claim = hourly(0.8, 0.1);
    let reinforced = claim
        .apply_reinforcement(&Reinforcement {
            evidence: EvidenceRef::new("doc://fresh", "sensor"),
            observed_at: Timestamp::UnixMillis(HOUR_MS),
            resets_clock: true,
        })
        .unwrap();
    let now = Timestamp::UnixMillis(HOUR_MS);
    let stale = decay(&claim, now, &DecayPolicy::default()).unwrap();
    let fresh = decay(&reinforced, now, &DecayPolicy::default()).unwrap();
    assert!((stale.effective_confidence - 0.4).abs() < 1e-12);
    assert!((fresh.effective_confidence - 0.8).abs() < 1e-12);
}
