//! Integration tests for `lambdaphp config`.
//!
//! All filesystem-touching tests set `LAMBDAPHP_CONFIG` to a temp path so
//! they never read or write `~/.lambdaphp/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lambdaphp() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lambdaphp"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    lambdaphp()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn test_config_show_without_file_lists_keys() {
    let (_dir, path) = temp_config_path();
    lambdaphp()
        .args(["config", "show"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("aws.region"))
        .stdout(predicate::str::contains("dashboard.port"));
}

#[test]
fn test_config_set_then_show_roundtrip() {
    let (_dir, path) = temp_config_path();
    lambdaphp()
        .args(["config", "set", "aws.region", "eu-west-1"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .success();

    let yaml = std::fs::read_to_string(&path).expect("config written");
    assert!(yaml.contains("eu-west-1"));

    lambdaphp()
        .args(["config", "show"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("eu-west-1"));
}

#[test]
fn test_config_show_json_contains_values() {
    let (_dir, path) = temp_config_path();
    lambdaphp()
        .args(["config", "set", "dashboard.port", "8080"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .success();

    let output = lambdaphp()
        .args(["config", "show", "--json"])
        .env("LAMBDAPHP_CONFIG", &path)
        .output()
        .expect("run lambdaphp");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(value["path"], path.as_str());
    assert_eq!(value["values"]["dashboard.port"], "8080");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    lambdaphp()
        .args(["config", "set", "aws.bucket", "x"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_port_fails() {
    let (_dir, path) = temp_config_path();
    lambdaphp()
        .args(["config", "set", "dashboard.port", "0"])
        .env("LAMBDAPHP_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dashboard.port"));
}

#[test]
fn test_config_set_json_error_is_json() {
    let (_dir, path) = temp_config_path();
    let output = lambdaphp()
        .args(["config", "set", "aws.bucket", "x", "--json"])
        .env("LAMBDAPHP_CONFIG", &path)
        .output()
        .expect("run lambdaphp");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON error");
    assert_eq!(value["error"], true);
}
