//! Decoder: populates a `Reflect` struct from a reconstructed tree.
//!
//! Responsibilities:
//! - Match every leaf field to its path in the `NestedMap`.
//! - Run decode hooks, then the leaf's weak conversion.
//!
//! Does NOT handle:
//! - Defaults or constraints (see `defaults.rs` and `validate.rs`).
//!
//! Invariants:
//! - Paths absent from the tree leave the field untouched.
//! - A value where a struct is expected, or a subtree where a leaf is
//!   expected, is a decode error naming the key.

use serde_yaml::Value;

use super::error::ConfigError;
use super::hooks::DecodeHooks;
use super::nested::{Lookup, NestedMap};
use crate::key::{join_key, normalize_key};
use crate::leaf::{Leaf, value_type_name};
use crate::schema::Reflect;
use crate::walk::walk_fields;

/// Decode `tree` (relative to `prefix`) into `target`.
pub(crate) fn decode_into(
    target: &mut dyn Reflect,
    prefix: &str,
    tree: &NestedMap,
    hooks: &DecodeHooks,
) -> Result<(), ConfigError> {
    walk_fields(target, prefix, |path, _, leaf| {
        let parts: Vec<String> = path.parts.iter().map(|p| normalize_key(p)).collect();
        match tree.lookup(&parts) {
            Lookup::Missing => Ok(()),
            Lookup::Value(raw) => decode_leaf(&path.full_key, leaf, raw.clone(), hooks),
            Lookup::Branch => Err(ConfigError::Decode {
                key: path.full_key.clone(),
                expected: leaf.kind().to_string(),
                actual: "mapping".to_string(),
            }),
            Lookup::Blocked { depth, value } => Err(ConfigError::Decode {
                key: format!("{prefix}.{}", join_key(&parts[..=depth])),
                expected: "struct".to_string(),
                actual: value_type_name(value).to_string(),
            }),
        }
    })
}

/// Coerce `raw` through `hooks` and decode it into `leaf`.
pub(crate) fn decode_leaf(
    key: &str,
    leaf: &mut dyn Leaf,
    raw: Value,
    hooks: &DecodeHooks,
) -> Result<(), ConfigError> {
    let coerced = hooks
        .apply(raw, leaf.kind())
        .map_err(|message| ConfigError::Hook {
            key: key.to_string(),
            message,
        })?;
    leaf.decode(&coerced).map_err(|mismatch| ConfigError::Decode {
        key: key.to_string(),
        expected: mismatch.expected.to_string(),
        actual: mismatch.actual.to_string(),
    })
}
