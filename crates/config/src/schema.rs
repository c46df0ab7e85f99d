//! Schema description consumed by the struct walker.
//!
//! Responsibilities:
//! - Define `Reflect`, the introspection facility a configuration struct
//!   implements to expose its fields (name, mapping key, default, constraints).
//! - Define `Configurable`, a `Reflect` type that also names its key-space prefix.
//!
//! Does NOT handle:
//! - Walking the description (see `walk.rs`).
//! - Converting raw values into field values (see `leaf.rs` and `loader/decode.rs`).
//!
//! Invariants:
//! - Fields that a `Reflect` impl does not describe are invisible to the loader.
//! - A mapping key of `""` or `"-"` falls back to the lower-cased field name.
//! - Embedded structs contribute their lower-cased type name as path segment
//!   unless they carry an explicit key.

use crate::leaf::Leaf;

/// Introspection over a configuration struct.
///
/// ```
/// use stratum_config::{Field, Reflect};
///
/// #[derive(Default)]
/// struct Pool {
///     size: u32,
/// }
///
/// impl Reflect for Pool {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![Field::leaf("Size", &mut self.size).default("4")]
///     }
/// }
/// ```
pub trait Reflect {
    /// Describe every field the loader may populate, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Unqualified type name, used as path segment for embedded structs.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// A configuration struct bound under a dotted prefix.
pub trait Configurable: Reflect {
    /// Dotted prefix identifying this struct's subtree (e.g. `"db"`).
    fn prefix(&self) -> &str;
}

/// What a described field points at.
pub enum Target<'a> {
    /// A scalar-like value decoded directly.
    Leaf(&'a mut dyn Leaf),
    /// A nested struct addressed through its own path segment.
    Nested(&'a mut dyn Reflect),
    /// An embedded struct; its default segment is its type name.
    Embedded(&'a mut dyn Reflect),
}

/// Descriptor for one field of a `Reflect` struct.
pub struct Field<'a> {
    name: &'static str,
    key: Option<&'static str>,
    default: Option<&'static str>,
    validate: Option<&'static str>,
    target: Target<'a>,
}

impl<'a> Field<'a> {
    /// Describe a leaf field.
    pub fn leaf<L: Leaf + 'a>(name: &'static str, target: &'a mut L) -> Self {
        Self::with_target(name, Target::Leaf(target))
    }

    /// Describe a nested struct field.
    pub fn nested<R: Reflect + 'a>(name: &'static str, target: &'a mut R) -> Self {
        Self::with_target(name, Target::Nested(target))
    }

    /// Describe an embedded struct; the field name is the struct's type name.
    pub fn embedded<R: Reflect + 'a>(target: &'a mut R) -> Self {
        let name = target.type_name();
        Self::with_target(name, Target::Embedded(target))
    }

    fn with_target(name: &'static str, target: Target<'a>) -> Self {
        Self {
            name,
            key: None,
            default: None,
            validate: None,
            target,
        }
    }

    /// Set the mapping key used in files and env-derived keys.
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the default literal applied when the field is still zero after decoding.
    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the comma-separated constraint list (e.g. `"required,min=1"`).
    pub fn validate(mut self, rules: &'static str) -> Self {
        self.validate = Some(rules);
        self
    }

    /// Rust field name as given to the descriptor.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Path segment this field contributes to its fully qualified key.
    pub fn segment(&self) -> String {
        match self.key {
            Some(key) if !key.is_empty() && key != "-" => key.to_string(),
            _ => self.name.to_lowercase(),
        }
    }

    pub(crate) fn into_parts(self) -> (FieldMeta, Target<'a>) {
        let meta = FieldMeta {
            name: self.name,
            default: self.default,
            validate: self.validate,
        };
        (meta, self.target)
    }
}

/// Tag-like metadata of a visited leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub validate: Option<&'static str>,
}

/// Strip module path and generic arguments from a `std::any::type_name` string.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
