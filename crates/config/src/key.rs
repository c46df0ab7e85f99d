//! Key normalization and environment variable naming.
//!
//! Responsibilities:
//! - Canonicalize dotted configuration keys (trim + lower-case) so file keys,
//!   env-derived keys and field-derived keys address the same slot.
//! - Turn a dotted key into an environment variable name via `EnvKeyReplacer`.
//!
//! Invariants:
//! - `normalize_key` is idempotent.
//! - Replacement patterns are tried in the order they were registered; at each
//!   position the first matching pattern wins and scanning resumes after it.

use crate::constants::{DEFAULT_ENV_REPLACEMENTS, KEY_SEPARATOR};

/// Canonicalize a configuration key: surrounding whitespace removed, lower-cased.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Split a normalized key into its dotted segments.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(KEY_SEPARATOR).collect()
}

/// Join key segments with the key separator.
pub fn join_key<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(KEY_SEPARATOR);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Ordered string substitutions applied when deriving environment variable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKeyReplacer {
    pairs: Vec<(String, String)>,
}

impl Default for EnvKeyReplacer {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_REPLACEMENTS.iter().copied())
    }
}

impl EnvKeyReplacer {
    /// Create a replacer from `(from, to)` pairs. Pairs with an empty `from` are ignored.
    pub fn new<I, F, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .filter(|(from, _)| !from.is_empty())
                .collect(),
        }
    }

    /// Apply every substitution in a single left-to-right pass.
    pub fn replace(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        'scan: while !rest.is_empty() {
            for (from, to) in &self.pairs {
                if let Some(tail) = rest.strip_prefix(from.as_str()) {
                    out.push_str(to);
                    rest = tail;
                    continue 'scan;
                }
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
        out
    }

    /// Environment variable name for `key`: `PREFIX_KEY` with substitutions applied, upper-cased.
    ///
    /// An empty prefix yields the bare replaced key.
    pub fn env_name(&self, prefix: &str, key: &str) -> String {
        let prefix = prefix.trim();
        let raw = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}_{key}")
        };
        self.replace(&raw).to_uppercase()
    }
}
