//! Environment variable access for the loader.
//!
//! Responsibilities:
//! - Read construction settings with empty/whitespace filtering.
//! - Read configuration values verbatim.
//! - Resolve the first set variable of an alias list.
//! - Parse the comma-separated search path variable.
//!
//! Does NOT handle:
//! - Deciding which variable names belong to a key (see `aliases.rs` and `key.rs`).
//!
//! Invariants:
//! - Settings (`env_var_or_none`): empty or whitespace-only variables are unset,
//!   values are trimmed.
//! - Values (`env_value`, `first_set`): only empty variables are unset, values
//!   are returned byte for byte.
//! - Variables are read at call time; nothing is cached.

use std::path::PathBuf;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Read a configuration value, returning None if unset or empty.
///
/// Whitespace is part of the value and is never trimmed.
pub(crate) fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// First variable in `names` that is set, with its value.
pub(crate) fn first_set<S: AsRef<str>>(names: &[S]) -> Option<(String, String)> {
    names.iter().find_map(|name| {
        let name = name.as_ref();
        env_value(name).map(|value| (name.to_string(), value))
    })
}

/// Split a comma-separated path list, dropping blank entries.
pub(crate) fn parse_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}
