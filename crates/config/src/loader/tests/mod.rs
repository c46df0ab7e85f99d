//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test loader construction, file layering and search path resolution.
//! - Test environment precedence: aliases, automatic variables, prefixes.
//! - Test the bind pipeline: decoding, coercion hooks, defaults, validation.
//! - Test concurrent use of one shared loader.
//!
//! Does NOT handle:
//! - Unit-level behavior of the individual stages (tested next to each module).
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use crate::loader::{Loader, LoaderBuilder};
use crate::schema::{Configurable, Field, Reflect};

pub mod dotenv_tests;
pub mod validation_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Variables the builder consults; tests clear them to stay hermetic.
pub const BUILDER_VARS: [&str; 3] = ["CONFIG_PATHS", "APP_ENV", "ENV_PREFIX"];

/// Write `<dir>/<name>` with `contents`.
pub fn write_config(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Temp dir holding a single `base.yaml`.
pub fn base_dir(contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "base.yaml", contents);
    dir
}

/// Loader over `dir` with the default prefix and no overlay.
pub fn loader_for(dir: &TempDir) -> Loader {
    LoaderBuilder::new()
        .with_config_paths([dir.path()])
        .with_env_prefix("STRATUM")
        .build()
        .unwrap()
}

/// Run `f` with the builder variables unset and `vars` applied.
pub fn with_clean_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
    let mut all: Vec<(&str, Option<&str>)> = BUILDER_VARS
        .iter()
        .filter(|name| !vars.iter().any(|(key, _)| key == *name))
        .map(|name| (*name, None))
        .collect();
    all.extend_from_slice(vars);
    temp_env::with_vars(all, f);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub tags: Vec<String>,
    pub debug: bool,
}

impl Reflect for ServerConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("Host", &mut self.host).key("host").default("localhost"),
            Field::leaf("Port", &mut self.port)
                .key("port")
                .default("8080")
                .validate("required,min=1,max=65535"),
            Field::leaf("Timeout", &mut self.timeout).key("timeout").default("30s"),
            Field::leaf("Tags", &mut self.tags).key("tags"),
            Field::leaf("Debug", &mut self.debug).key("debug"),
        ]
    }
}

impl Configurable for ServerConfig {
    fn prefix(&self) -> &str {
        "server"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolConfig {
    pub size: u32,
    pub idle: Duration,
}

impl Reflect for PoolConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("Size", &mut self.size).key("size").default("4"),
            Field::leaf("Idle", &mut self.idle).key("idle"),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbConfig {
    pub dsn: String,
    pub user: String,
    pub pool: PoolConfig,
    pub rotated_at: DateTime<Utc>,
}

impl Reflect for DbConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("DSN", &mut self.dsn).key("dsn").validate("required"),
            Field::leaf("User", &mut self.user).key("user"),
            Field::nested("Pool", &mut self.pool).key("pool"),
            Field::leaf("RotatedAt", &mut self.rotated_at).key("rotated_at"),
        ]
    }
}

impl Configurable for DbConfig {
    fn prefix(&self) -> &str {
        "db"
    }
}
