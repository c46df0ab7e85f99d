//! Leaf value types and their weakly typed conversions.
//!
//! Responsibilities:
//! - Define the `Leaf` trait: a field value that can be decoded from a raw
//!   `serde_yaml::Value`, tested for its zero value and measured for validation.
//! - Implement `Leaf` for the supported scalar types, durations, string lists,
//!   timestamps, secrets and paths.
//!
//! Does NOT handle:
//! - Textual coercions such as `"1m"` or `"a,b,c"` (see `loader/hooks.rs`);
//!   those run before a leaf sees the value.
//!
//! Invariants:
//! - Decoding never reads the previous field value; it only overwrites it.
//! - The zero value of every leaf is its `Default::default()`.
//! - Durations decode from integer nanoseconds, timestamps from the private
//!   `!timestamp` tagged form or integer Unix seconds.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_yaml::Value;

/// Tag of the canonical timestamp form produced by the RFC3339 hook.
pub(crate) const TIMESTAMP_TAG: &str = "timestamp";

/// Destination type of a leaf, as seen by decode hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    String,
    Bool,
    Int,
    Uint,
    Float,
    Duration,
    List,
    Timestamp,
    Secret,
    Path,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeafKind::String => "string",
            LeafKind::Bool => "bool",
            LeafKind::Int => "int",
            LeafKind::Uint => "uint",
            LeafKind::Float => "float",
            LeafKind::Duration => "duration",
            LeafKind::List => "list",
            LeafKind::Timestamp => "timestamp",
            LeafKind::Secret => "secret",
            LeafKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// Quantity a constraint such as `min=` compares against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Number(f64),
    Length(usize),
}

impl Measure {
    pub fn as_f64(self) -> f64 {
        match self {
            Measure::Number(n) => n,
            Measure::Length(len) => len as f64,
        }
    }
}

/// A raw value could not be converted into the leaf's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: LeafKind,
    pub actual: &'static str,
}

impl Mismatch {
    fn new(expected: LeafKind, raw: &Value) -> Self {
        Self {
            expected,
            actual: value_type_name(raw),
        }
    }
}

/// A field value the loader can populate.
pub trait Leaf {
    fn kind(&self) -> LeafKind;

    /// Overwrite the value from a raw source value (weakly typed).
    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch>;

    /// Whether the value equals its type's zero value.
    fn is_zero(&self) -> bool;

    /// Number or length used by numeric constraints.
    fn measure(&self) -> Measure;

    /// Textual form used by enumeration constraints.
    fn text(&self) -> String;
}

/// Human-readable type name of a raw value, used in decode errors.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Scalar rendered as text; `None` for sequences and mappings.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Boolean literals accepted from text: `1 t T TRUE true True 0 f F FALSE false False`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn weak_i128(raw: &Value) -> Option<i128> {
    match raw {
        Value::Bool(b) => Some(i128::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(i128::from(u))
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i128)
            }
        }
        Value::String(s) if s.is_empty() => Some(0),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn weak_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl Leaf for String {
    fn kind(&self) -> LeafKind {
        LeafKind::String
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        *self = scalar_to_string(raw).ok_or_else(|| Mismatch::new(LeafKind::String, raw))?;
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn measure(&self) -> Measure {
        Measure::Length(self.chars().count())
    }

    fn text(&self) -> String {
        self.clone()
    }
}

impl Leaf for bool {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        *self = match raw {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) if s.is_empty() => false,
            Value::String(s) => {
                parse_bool(s.trim()).ok_or_else(|| Mismatch::new(LeafKind::Bool, raw))?
            }
            _ => return Err(Mismatch::new(LeafKind::Bool, raw)),
        };
        Ok(())
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn measure(&self) -> Measure {
        Measure::Number(if *self { 1.0 } else { 0.0 })
    }

    fn text(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_leaf {
    ($kind:expr => $($ty:ty),+) => {$(
        impl Leaf for $ty {
            fn kind(&self) -> LeafKind {
                $kind
            }

            fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
                *self = weak_i128(raw)
                    .and_then(|wide| <$ty>::try_from(wide).ok())
                    .ok_or_else(|| Mismatch::new($kind, raw))?;
                Ok(())
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn measure(&self) -> Measure {
                Measure::Number(*self as f64)
            }

            fn text(&self) -> String {
                self.to_string()
            }
        }
    )+};
}

integer_leaf!(LeafKind::Int => i8, i16, i32, i64, isize);
integer_leaf!(LeafKind::Uint => u8, u16, u32, u64, usize);

macro_rules! float_leaf {
    ($($ty:ty),+) => {$(
        impl Leaf for $ty {
            fn kind(&self) -> LeafKind {
                LeafKind::Float
            }

            fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
                let wide = weak_f64(raw).ok_or_else(|| Mismatch::new(LeafKind::Float, raw))?;
                let narrowed = wide as $ty;
                // A finite source that overflows the target type is out of range
                if wide.is_finite() && !narrowed.is_finite() {
                    return Err(Mismatch::new(LeafKind::Float, raw));
                }
                *self = narrowed;
                Ok(())
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn measure(&self) -> Measure {
                Measure::Number(f64::from(*self))
            }

            fn text(&self) -> String {
                self.to_string()
            }
        }
    )+};
}

float_leaf!(f32, f64);

impl Leaf for Duration {
    fn kind(&self) -> LeafKind {
        LeafKind::Duration
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        let nanos = weak_i128(raw)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| Mismatch::new(LeafKind::Duration, raw))?;
        *self = Duration::from_nanos(nanos);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_zero()
    }

    fn measure(&self) -> Measure {
        Measure::Number(self.as_nanos() as f64)
    }

    fn text(&self) -> String {
        format!("{self:?}")
    }
}

impl Leaf for Vec<String> {
    fn kind(&self) -> LeafKind {
        LeafKind::List
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        *self = match raw {
            Value::Sequence(items) => items
                .iter()
                .map(|item| scalar_to_string(item).ok_or_else(|| Mismatch::new(LeafKind::List, item)))
                .collect::<Result<_, _>>()?,
            Value::Mapping(_) => return Err(Mismatch::new(LeafKind::List, raw)),
            scalar => vec![scalar_to_string(scalar).unwrap_or_default()],
        };
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn measure(&self) -> Measure {
        Measure::Length(self.len())
    }

    fn text(&self) -> String {
        self.join(",")
    }
}

impl Leaf for DateTime<Utc> {
    fn kind(&self) -> LeafKind {
        LeafKind::Timestamp
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        let parsed = match raw {
            Value::Tagged(tagged) if tagged.tag == TIMESTAMP_TAG => tagged
                .value
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            _ => None,
        };
        *self = parsed.ok_or_else(|| Mismatch::new(LeafKind::Timestamp, raw))?;
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }

    fn measure(&self) -> Measure {
        Measure::Number(self.timestamp() as f64)
    }

    fn text(&self) -> String {
        self.to_rfc3339()
    }
}

impl Leaf for SecretString {
    fn kind(&self) -> LeafKind {
        LeafKind::Secret
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        let value = scalar_to_string(raw).ok_or_else(|| Mismatch::new(LeafKind::Secret, raw))?;
        *self = SecretString::from(value);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.expose_secret().is_empty()
    }

    fn measure(&self) -> Measure {
        Measure::Length(self.expose_secret().chars().count())
    }

    fn text(&self) -> String {
        self.expose_secret().to_string()
    }
}

impl Leaf for PathBuf {
    fn kind(&self) -> LeafKind {
        LeafKind::Path
    }

    fn decode(&mut self, raw: &Value) -> Result<(), Mismatch> {
        let value = scalar_to_string(raw).ok_or_else(|| Mismatch::new(LeafKind::Path, raw))?;
        *self = PathBuf::from(value);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn measure(&self) -> Measure {
        Measure::Length(self.as_os_str().len())
    }

    fn text(&self) -> String {
        self.display().to_string()
    }
}
