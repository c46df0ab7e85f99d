//! Validation tests for the bind pipeline.
//!
//! Responsibilities:
//! - Test that defaults are applied before constraints are checked.
//! - Test aggregated violations and their field order.
//! - Test that malformed constraint declarations are usage errors.

use std::time::Duration;

use serial_test::serial;

use super::{DbConfig, ServerConfig, base_dir, env_lock, loader_for, with_clean_env};
use crate::loader::ConfigError;
use crate::schema::{Configurable, Field, Reflect};

#[derive(Debug, Default)]
struct WorkerPool {
    name: String,
    mode: String,
    workers: u32,
    drain: Duration,
    labels: Vec<String>,
}

impl Reflect for WorkerPool {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("Name", &mut self.name).key("name").validate("required"),
            Field::leaf("Mode", &mut self.mode)
                .key("mode")
                .default("batch")
                .validate("oneof=batch stream"),
            Field::leaf("Workers", &mut self.workers)
                .key("workers")
                .validate("required,min=1,max=64"),
            Field::leaf("Drain", &mut self.drain)
                .key("drain")
                .validate("omitempty,lte=1m"),
            Field::leaf("Labels", &mut self.labels)
                .key("labels")
                .validate("omitempty,max=3"),
        ]
    }
}

impl Configurable for WorkerPool {
    fn prefix(&self) -> &str {
        "pool"
    }
}

#[test]
#[serial]
fn test_default_satisfies_required() {
    let _lock = env_lock().lock().unwrap();
    let dir = base_dir("server:\n  host: api.local\n");

    with_clean_env(&[], || {
        // port is required, but its default fills it before validation
        let server: ServerConfig = loader_for(&dir).load().unwrap();
        assert_eq!(server.port, 8080);
    });
}

#[test]
#[serial]
fn test_missing_required_field() {
    let _lock = env_lock().lock().unwrap();
    let dir = base_dir("db:\n  user: app\n");

    with_clean_env(&[], || {
        let err = loader_for(&dir).load::<DbConfig>().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.violations().len(), 1);
                let first = errors.first().unwrap();
                assert_eq!(first.key, "db.dsn");
                assert_eq!(first.rule, "required");
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
#[serial]
fn test_every_violation_is_reported() {
    let _lock = env_lock().lock().unwrap();
    let dir = base_dir(
        "pool:\n  mode: realtime\n  workers: 100\n  drain: 5m\n  labels: \"a,b,c,d\"\n",
    );

    with_clean_env(&[], || {
        let err = loader_for(&dir).load::<WorkerPool>().unwrap_err();
        let ConfigError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let keys: Vec<&str> = errors.violations().iter().map(|v| v.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["pool.name", "pool.mode", "pool.workers", "pool.drain", "pool.labels"]
        );
        assert_eq!(errors.violations()[1].message, "must be one of [batch stream]");
        assert_eq!(errors.violations()[2].message, "must be at most 64");
        assert_eq!(errors.violations()[4].message, "length must be at most 3");
        // Values never leak into messages
        assert!(!errors.to_string().contains("realtime"));
    });
}

#[test]
#[serial]
fn test_valid_values_pass_and_omitempty_skips() {
    let _lock = env_lock().lock().unwrap();
    let dir = base_dir("pool:\n  name: ingest\n  workers: 8\n");

    with_clean_env(&[("STRATUM_POOL_WORKERS", Some("12"))], || {
        let pool: WorkerPool = loader_for(&dir).load().unwrap();
        assert_eq!(pool.name, "ingest");
        assert_eq!(pool.mode, "batch");
        assert_eq!(pool.workers, 12);
        assert_eq!(pool.drain, Duration::ZERO);
        assert!(pool.labels.is_empty());
    });
}

#[derive(Debug, Default)]
struct Misdeclared {
    contact: String,
}

impl Reflect for Misdeclared {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::leaf("Contact", &mut self.contact).key("contact").validate("required,email")]
    }
}

impl Configurable for Misdeclared {
    fn prefix(&self) -> &str {
        "support"
    }
}

#[test]
#[serial]
fn test_unknown_rule_is_usage_error() {
    let _lock = env_lock().lock().unwrap();
    let dir = base_dir("support:\n  contact: ops\n");

    with_clean_env(&[], || {
        let err = loader_for(&dir).load::<Misdeclared>().unwrap_err();
        assert!(!err.is_validation());
        match err {
            ConfigError::InvalidRule { key, rule, .. } => {
                assert_eq!(key, "support.contact");
                assert_eq!(rule, "email");
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}
