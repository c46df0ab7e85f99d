//! Integration tests for dotenv handling in the CLI.
//!
//! Responsibilities:
//! - Prove that `.env` values reach the loader (search paths and key variables).
//! - Prove that invalid `.env` files cause the CLI to fail at startup without
//!   leaking their contents.
//! - Ensure DOTENV_DISABLED=1 allows the CLI to skip a malformed `.env`.
//!
//! Invariants:
//! - Tests must explicitly clear `DOTENV_DISABLED` to enable dotenv loading.
//! - Tests use temp directories and set current_dir to isolate `.env` file effects.

mod common;

use common::{config_dir, stratum_cmd};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_dotenv_supplies_config_paths_and_overrides() {
    let configs = config_dir("server:\n  port: 8000\n", &[]);
    let work_dir = TempDir::new().unwrap();
    fs::write(
        work_dir.path().join(".env"),
        format!(
            "CONFIG_PATHS={}\nSTRATUM_SERVER_PORT=8100\n",
            configs.path().display()
        ),
    )
    .unwrap();

    stratum_cmd()
        .current_dir(work_dir.path())
        .env_remove("DOTENV_DISABLED")
        .args(["get", "server.port"])
        .assert()
        .success()
        .stdout("8100\t(env STRATUM_SERVER_PORT)\n");
}

#[test]
fn test_invalid_dotenv_causes_cli_failure_without_leaking() {
    let temp_dir = TempDir::new().unwrap();
    let secret_value = "supersecret_dotenv_value_12345";
    fs::write(
        temp_dir.path().join(".env"),
        format!("STRATUM_DB_PASSWORD={secret_value}\nINVALID LINE {secret_value}"),
    )
    .unwrap();

    let output = stratum_cmd()
        .current_dir(temp_dir.path())
        .env_remove("DOTENV_DISABLED")
        .args(["files"])
        .output()
        .expect("Failed to run command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains(secret_value),
        "Error message should NOT contain the secret value. stderr: {}",
        stderr
    );
    assert!(
        stderr.contains(".env"),
        "Error message should mention .env file. stderr: {}",
        stderr
    );
}

#[test]
fn test_dotenv_disabled_skips_invalid_env_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    stratum_cmd()
        .current_dir(temp_dir.path())
        .env("DOTENV_DISABLED", "1")
        .args(["env-name", "server.port"])
        .assert()
        .success()
        .stdout("STRATUM_SERVER_PORT\n");
}

#[test]
fn test_dotenv_parse_error_includes_hint() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    stratum_cmd()
        .current_dir(temp_dir.path())
        .env_remove("DOTENV_DISABLED")
        .args(["files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("position").and(predicate::str::contains("DOTENV_DISABLED")));
}
