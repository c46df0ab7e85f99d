//! Struct walker.
//!
//! Responsibilities:
//! - Traverse a `Reflect` struct recursively and visit every leaf field with
//!   its fully qualified dotted key and its path relative to the prefix.
//!
//! Does NOT handle:
//! - Deciding what to do with a leaf (decode, default, validate); callers pass
//!   a visitor.
//!
//! Invariants:
//! - Nested and embedded structs are entered, leaves (timestamps included) are not.
//! - A trailing `.` on the prefix is ignored; an empty prefix yields keys made
//!   of the path segments alone.
//! - Segments keep the case given by the field descriptor.

use crate::key::join_key;
use crate::leaf::Leaf;
use crate::loader::ConfigError;
use crate::schema::{FieldMeta, Reflect, Target};

/// Location of a visited leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// Prefix plus every segment, dot-joined.
    pub full_key: String,
    /// Segments below the prefix, outermost first.
    pub parts: Vec<String>,
}

/// Visit every leaf field of `target`, depth first in declaration order.
pub fn walk_fields<F>(target: &mut dyn Reflect, prefix: &str, mut visit: F) -> Result<(), ConfigError>
where
    F: FnMut(&FieldPath, &FieldMeta, &mut dyn Leaf) -> Result<(), ConfigError>,
{
    let prefix = prefix.trim_end_matches('.');
    let mut path = Vec::new();
    walk(target, prefix, &mut path, &mut visit)
}

fn walk<F>(
    target: &mut dyn Reflect,
    prefix: &str,
    path: &mut Vec<String>,
    visit: &mut F,
) -> Result<(), ConfigError>
where
    F: FnMut(&FieldPath, &FieldMeta, &mut dyn Leaf) -> Result<(), ConfigError>,
{
    for field in target.fields() {
        path.push(field.segment());
        let (meta, slot) = field.into_parts();
        match slot {
            Target::Leaf(leaf) => {
                let location = FieldPath {
                    full_key: full_key(prefix, path),
                    parts: path.clone(),
                };
                visit(&location, &meta, leaf)?;
            }
            Target::Nested(inner) | Target::Embedded(inner) => walk(inner, prefix, path, visit)?,
        }
        path.pop();
    }
    Ok(())
}

fn full_key(prefix: &str, parts: &[String]) -> String {
    if prefix.is_empty() {
        join_key(parts)
    } else {
        format!("{prefix}.{}", join_key(parts))
    }
}

/// Collect the fully qualified key of every leaf of `target`.
pub fn leaf_keys(target: &mut dyn Reflect, prefix: &str) -> Result<Vec<String>, ConfigError> {
    let mut keys = Vec::new();
    walk_fields(target, prefix, |path, _, _| {
        keys.push(path.full_key.clone());
        Ok(())
    })?;
    Ok(keys)
}
