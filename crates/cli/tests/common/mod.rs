//! Shared test utilities for stratum-config integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write throwaway configuration directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `CONFIG_PATHS`, `ENV_PREFIX` and `APP_ENV` are cleared so the host
//!   environment cannot leak into assertions.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Returns a hermetic `stratum-config` command for integration testing.
pub fn stratum_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("stratum-config");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("CONFIG_PATHS")
        .env_remove("ENV_PREFIX")
        .env_remove("APP_ENV")
        .env_remove("RUST_LOG");

    // Clear automatic variables of the default prefix
    for (key, _) in std::env::vars() {
        if key.starts_with("STRATUM_") {
            cmd.env_remove(&key);
        }
    }

    cmd
}

/// Temp dir holding `base.yaml` plus optional `(name, contents)` overlays.
pub fn config_dir(base: &str, overlays: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("base.yaml"), base).unwrap();
    for (name, contents) in overlays {
        fs::write(dir.path().join(format!("{name}.yaml")), contents).unwrap();
    }
    dir
}
