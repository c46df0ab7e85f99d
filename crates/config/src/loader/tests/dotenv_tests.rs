//! Tests for dotenv loading behavior.
//!
//! Responsibilities:
//! - Test that missing `.env` files are silently ignored.
//! - Test that invalid `.env` files return errors without leaking secrets.
//! - Test that `DOTENV_DISABLED=1`/`true` skips dotenv loading.
//! - Test that `.env` variables feed environment resolution like real ones.
//!
//! Invariants / Assumptions:
//! - Tests use `env_lock()` to prevent cross-test contamination.
//! - Tests must serialize mutations to process-global state (cwd/env).
//! - Error messages must never contain secret values from `.env` files.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use super::{DbConfig, env_lock, with_clean_env, write_config};
use crate::loader::{ConfigError, LoaderBuilder};

/// RAII guard for temporarily changing the current working directory.
struct CwdGuard {
    original_dir: PathBuf,
}

impl CwdGuard {
    fn new(temp_dir: &TempDir) -> Self {
        let original_dir = std::env::current_dir().expect("Failed to get current directory");
        std::env::set_current_dir(temp_dir.path()).expect("Failed to set current directory");
        Self { original_dir }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original_dir);
    }
}

#[test]
#[serial]
fn test_missing_dotenv_is_ok() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    temp_env::with_var_unset("DOTENV_DISABLED", || {
        let result = LoaderBuilder::new().load_dotenv();
        assert!(result.is_ok(), "Missing .env file should be silently ignored");
    });
}

#[test]
#[serial]
fn test_invalid_dotenv_returns_parse_error() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    temp_env::with_var_unset("DOTENV_DISABLED", || {
        match LoaderBuilder::new().load_dotenv() {
            Err(ConfigError::DotenvParse { .. }) => {}
            Err(other) => panic!("Invalid .env should return DotenvParse error, got {other}"),
            Ok(_) => panic!("Invalid .env should return DotenvParse error, got Ok"),
        }
    });
}

#[test]
#[serial]
fn test_dotenv_parse_error_does_not_leak_secrets() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);

    let secret = "super-secret-dsn-12345";
    fs::write(
        temp_dir.path().join(".env"),
        format!("STRATUM_DB_DSN={secret}\nBROKEN LINE {secret}\n"),
    )
    .unwrap();

    temp_env::with_vars(
        [("DOTENV_DISABLED", None::<&str>), ("STRATUM_DB_DSN", None)],
        || {
            let err = LoaderBuilder::new().load_dotenv().unwrap_err();
            let message = err.to_string();
            assert!(!message.contains(secret), "Error leaked secret: {message}");
            assert!(!format!("{err:?}").contains(secret));
            assert!(message.contains("DOTENV_DISABLED"));
        },
    );
}

#[test]
#[serial]
fn test_dotenv_disabled_skips_invalid_file() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);
    fs::write(temp_dir.path().join(".env"), "INVALID_LINE_WITHOUT_EQUALS").unwrap();

    for value in ["1", "true"] {
        temp_env::with_var("DOTENV_DISABLED", Some(value), || {
            assert!(
                LoaderBuilder::new().load_dotenv().is_ok(),
                "DOTENV_DISABLED={value} should skip .env loading"
            );
        });
    }
}

#[test]
#[serial]
fn test_dotenv_values_feed_aliases() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let _cwd_guard = CwdGuard::new(&temp_dir);
    fs::write(
        temp_dir.path().join(".env"),
        "STRATUM_DOTENV_TEST_DSN=postgres://from-dotenv\n",
    )
    .unwrap();
    write_config(temp_dir.path(), "base.yaml", "db:\n  user: app\n");

    with_clean_env(
        &[
            ("DOTENV_DISABLED", None),
            ("STRATUM_DOTENV_TEST_DSN", None),
        ],
        || {
            let loader = LoaderBuilder::new()
                .load_dotenv()
                .unwrap()
                .with_config_paths([temp_dir.path()])
                .build()
                .unwrap();
            loader
                .bind_env("db.dsn", &["STRATUM_DOTENV_TEST_DSN"])
                .unwrap();

            let db: DbConfig = loader.load().unwrap();
            assert_eq!(db.dsn, "postgres://from-dotenv");
        },
    );
}
