//! Integration tests for the portal CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.
//! Every command runs with its own config directory and without the
//! `PORTAL_*` environment overrides of the host.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A backend address nothing listens on
const UNREACHABLE: &str = "http://127.0.0.1:9/api";

/// Helper to get a portal command isolated in `config_dir`
fn portal(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portal").unwrap();
    cmd.env("PORTAL_CONFIG_DIR", config_dir.path())
        .env_remove("PORTAL_BASE_URL")
        .env_remove("PORTAL_PAGE_SIZE")
        .env_remove("PORTAL_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reference data"))
        .stdout(predicate::str::contains("employee"))
        .stdout(predicate::str::contains("budget"))
        .stdout(predicate::str::contains("tech"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portal"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .arg("payroll")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_entity_help_lists_draft_flags() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["journey", "new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--destination"))
        .stdout(predicate::str::contains("--days"))
        .stdout(predicate::str::contains("--budget"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("portal"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_keys_lists_settings() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("page_size"));
}

#[test]
fn test_config_set_then_show() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "set", "page_size", "25"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
    assert!(written.contains("page_size: 25"));

    portal(&tmp)
        .args(["config", "show", "page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("25\n"));
}

#[test]
fn test_config_show_defaults() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "show", "base_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:5000/api"));
}

#[test]
fn test_env_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "set", "page_size", "25"])
        .assert()
        .success();

    portal(&tmp)
        .env("PORTAL_PAGE_SIZE", "50")
        .args(["config", "show", "page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("50\n"));
}

#[test]
fn test_config_rejects_invalid_values() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "set", "page_size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive whole number"));

    portal(&tmp)
        .args(["config", "set", "base_url", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http://"));

    portal(&tmp)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    assert!(!tmp.path().join("config.yaml").exists());
}

#[test]
fn test_config_unset_removes_key() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "set", "timeout_secs", "5"])
        .assert()
        .success();
    portal(&tmp)
        .args(["config", "unset", "timeout_secs"])
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
    assert!(!written.contains("timeout_secs"));

    portal(&tmp)
        .args(["config", "unset", "timeout_secs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_path_uses_override_dir() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

// ============================================================================
// Entity Command Tests (no backend needed)
// ============================================================================

#[test]
fn test_invalid_draft_fails_before_network() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", UNREACHABLE])
        .args([
            "journey",
            "new",
            "--name",
            "Ab",
            "--description",
            "Two weeks at headquarters",
            "--destination",
            "London",
            "--days",
            "14",
            "--budget",
            "2500",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please enter a valid journey name (at least 3 characters)",
        ));
}

#[test]
fn test_budget_year_out_of_range() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", UNREACHABLE])
        .args([
            "budget", "new", "--type", "Travel", "--amount", "1000", "--year", "1800",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Financial year must be between 1900 and 2100",
        ));
}

#[test]
fn test_search_rejects_non_positive_id() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", UNREACHABLE, "employee", "search", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid positive ID"));
}

#[test]
fn test_unreachable_backend_reports_load_failure() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", UNREACHABLE, "grade", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to load grades. Please try again.",
        ));
}

#[test]
fn test_unreachable_backend_from_config() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["config", "set", "base_url", UNREACHABLE])
        .assert()
        .success();

    portal(&tmp)
        .args(["tech", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to load technologies. Please try again.",
        ));
}

#[test]
fn test_bad_base_url_flag() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", "localhost:5000", "role", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_delete_without_terminal_is_cancelled() {
    let tmp = TempDir::new().unwrap();
    portal(&tmp)
        .args(["--base-url", UNREACHABLE, "employee", "delete", "1"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}
