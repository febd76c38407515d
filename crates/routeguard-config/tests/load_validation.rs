// crates/routeguard-config/tests/load_validation.rs
// ============================================================================
// Module: Policy Load Validation Tests
// Description: Path, size, encoding, and decode guards on policy loading.
// Purpose: Ensure policy input handling is strict and fail-closed.
// ============================================================================

//! Policy load validation tests for routeguard-config.

use std::io::Write;
use std::path::Path;

use routeguard_config::ConfigError;
use routeguard_config::load_policy;
use routeguard_config::policy_json_example;
use routeguard_config::policy_toml_example;
use routeguard_core::OutputMode;
use routeguard_core::ValidatedPolicy;
use tempfile::Builder;
use tempfile::NamedTempFile;

/// Test outcome with a readable failure message.
type TestResult = Result<(), String>;

/// Asserts that a load failed with a message containing `needle`.
fn assert_invalid(result: Result<ValidatedPolicy, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid policy load".to_string()),
    }
}

/// Writes `content` to a temp file ending in `suffix`.
fn write_temp(suffix: &str, content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = Builder::new().suffix(suffix).tempfile().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

// ============================================================================
// SECTION: Input Guards
// ============================================================================

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(load_policy(Some(Path::new(&long_path))), "policy path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(load_policy(Some(Path::new(&long_component))), "policy path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_temp(".json", &vec![b'a'; 1_048_577])?;
    assert_invalid(load_policy(Some(file.path())), "policy file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_temp(".json", &[0xFF, 0xFE, 0xFF])?;
    assert_invalid(load_policy(Some(file.path())), "policy file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("absent.json");
    assert_invalid(load_policy(Some(&missing)), "policy io error")
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

#[test]
fn load_accepts_json_example() -> TestResult {
    let file = write_temp(".json", policy_json_example().as_bytes())?;
    let policy = load_policy(Some(file.path())).map_err(|err| err.to_string())?;
    if policy.policy_id().as_str() != "routeguard-default" {
        return Err(format!("unexpected policy id {}", policy.policy_id().as_str()));
    }
    let output = policy.policy().structured_output.as_ref().ok_or("missing structured_output")?;
    if output.mode != OutputMode::Strict {
        return Err("expected STRICT output mode".to_string());
    }
    Ok(())
}

#[test]
fn toml_example_matches_json_example() -> TestResult {
    let json = write_temp(".json", policy_json_example().as_bytes())?;
    let toml = write_temp(".toml", policy_toml_example().as_bytes())?;
    let from_json = load_policy(Some(json.path())).map_err(|err| err.to_string())?;
    let from_toml = load_policy(Some(toml.path())).map_err(|err| err.to_string())?;
    if from_json != from_toml {
        return Err("toml and json examples diverge".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_malformed_json() -> TestResult {
    let file = write_temp(".json", b"{\"policy_id\": ")?;
    assert_invalid(load_policy(Some(file.path())), "policy parse error")
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_temp(".json", br#"{"policy_id": "p", "tool": {}}"#)?;
    assert_invalid(load_policy(Some(file.path())), "policy parse error")
}

#[test]
fn load_rejects_json_content_in_toml_file() -> TestResult {
    let file = write_temp(".toml", br#"{"policy_id": "p"}"#)?;
    assert_invalid(load_policy(Some(file.path())), "policy parse error")
}

#[test]
fn load_rejects_invalid_policy() -> TestResult {
    let document = br#"{
        "policy_id": "p",
        "tools": {"sandbox": {"required": true}}
    }"#;
    let file = write_temp(".json", document)?;
    assert_invalid(load_policy(Some(file.path())), "allowed_profiles")
}
