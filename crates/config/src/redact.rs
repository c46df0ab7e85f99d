//! Redaction of sensitive configuration values.
//!
//! Responsibilities:
//! - Decide whether a key names sensitive material (passwords, tokens, keys).
//! - Render values for logs and CLI output with sensitive ones masked.
//!
//! Invariants:
//! - Matching is a case-insensitive substring test on the whole dotted key.
//! - A sensitive value is never rendered, whatever its type.

use serde_yaml::Value;

use crate::constants::REDACTED;
use crate::leaf::scalar_to_string;

const SENSITIVE_FRAGMENTS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "key",
    "api_key",
    "apikey",
    "private",
    "pem",
    "hmac",
    "credential",
    "dsn",
    "connection_string",
];

/// Whether `key` looks like it holds sensitive material.
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}

/// Render `value` for display, masking it when `key` is sensitive.
pub fn display_value(key: &str, value: &Value) -> String {
    if is_sensitive_key(key) {
        return REDACTED.to_string();
    }
    render_value(value)
}

/// Render `value` without masking.
///
/// Scalars render as plain text; sequences and mappings as YAML.
pub fn render_value(value: &Value) -> String {
    match scalar_to_string(value) {
        Some(text) => text,
        None => serde_yaml::to_string(value)
            .map(|yaml| yaml.trim_end().to_string())
            .unwrap_or_default(),
    }
}
