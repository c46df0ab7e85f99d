//! Error types for configuration loading and binding.
//!
//! Responsibilities:
//! - Define error variants for every failure class: usage, source, decode and validation.
//! - Carry every constraint violation of a bind call in `ValidationErrors`.
//!
//! Does NOT handle:
//! - Retrying; resolution is deterministic, so none of these errors is transient.
//!
//! Invariants:
//! - Every variant names the offending key, path, or rule.
//! - Parse errors NEVER include raw file contents, only positions, to avoid
//!   echoing secrets that live in configuration files.
//! - Validation messages never include the value of a string or secret field.
//! - Dotenv errors NEVER include raw .env line contents.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while constructing a loader or binding a section.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("prefix cannot be empty")]
    EmptyPrefix,

    #[error("cannot bind empty key")]
    EmptyKey,

    #[error("invalid constraint '{rule}' on {key}: {message}")]
    InvalidRule {
        key: String,
        rule: String,
        message: String,
    },

    #[error("Failed to read config file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    #[error("failed to read config from reader: {message}")]
    ReaderParse { message: String },

    /// Failed to parse the `.env` file.
    ///
    /// SAFETY: Only the error position is reported, never the line contents.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,

    #[error("failed to decode '{key}': expected {expected}, got {actual}")]
    Decode {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("failed to decode '{key}': {message}")]
    Hook { key: String, message: String },

    #[error("failed to set default for '{key}': {message}")]
    Default { key: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl ConfigError {
    /// Whether this error is a constraint violation (as opposed to a usage,
    /// source, or decode failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Validation(_))
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Fully qualified key of the field.
    pub key: String,
    /// The rule that failed, as written (e.g. `max=65535`).
    pub rule: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.key, self.message, self.rule)
    }
}

/// Every constraint violation found in one bind call, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// The first violation, in field declaration order.
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
