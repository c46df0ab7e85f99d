//! Decode hooks: textual coercions applied before a leaf decodes a raw value.
//!
//! Responsibilities:
//! - Define the `DecodeHook` trait and the ordered `DecodeHooks` composition.
//! - Provide the standard hooks: duration literals, separator lists and RFC3339
//!   timestamps (with `""` meaning the zero timestamp).
//! - Parse duration literals such as `"1m"`, `"1.5h"` or `"2h30m15s"`.
//!
//! Does NOT handle:
//! - Weak scalar conversions such as `"8080"` into an integer (see `leaf.rs`).
//!
//! Invariants:
//! - Hooks only rewrite strings whose destination is not a string; anything
//!   else passes through unchanged.
//! - Hooks run in composition order, each seeing the previous hook's output.
//! - A hook error aborts the bind call with the offending key.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};

use crate::constants::DEFAULT_LIST_SEPARATOR;
use crate::leaf::{LeafKind, TIMESTAMP_TAG};

/// A coercion applied to a raw value before it is decoded into a leaf of kind `target`.
pub trait DecodeHook: Send + Sync {
    fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String>;
}

impl<F> DecodeHook for F
where
    F: Fn(Value, LeafKind) -> Result<Value, String> + Send + Sync,
{
    fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String> {
        self(value, target)
    }
}

/// Ordered composition of decode hooks.
#[derive(Clone)]
pub struct DecodeHooks {
    hooks: Vec<Arc<dyn DecodeHook>>,
}

impl DecodeHooks {
    /// Duration literals, comma lists, then RFC3339 timestamps.
    pub fn standard() -> Self {
        Self::none()
            .with(StringToDuration)
            .with(StringToList::new(DEFAULT_LIST_SEPARATOR))
            .with(Rfc3339ToTimestamp)
    }

    /// No coercions: only weak scalar conversion applies.
    pub fn none() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Append a hook to the end of the chain.
    pub fn with<H: DecodeHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in order.
    pub fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String> {
        self.hooks
            .iter()
            .try_fold(value, |value, hook| hook.apply(value, target))
    }
}

impl Default for DecodeHooks {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DecodeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeHooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}

/// `"1m30s"` into a duration (canonical form: integer nanoseconds).
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToDuration;

impl DecodeHook for StringToDuration {
    fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String> {
        match (&value, target) {
            (Value::String(s), LeafKind::Duration) => {
                let nanos = duration_nanos(parse_duration(s)?)?;
                Ok(Value::Number(nanos.into()))
            }
            _ => Ok(value),
        }
    }
}

fn duration_nanos(d: Duration) -> Result<u64, String> {
    u64::try_from(d.as_nanos()).map_err(|_| "duration out of range".to_string())
}

/// `"a,b,c"` into a sequence of strings. An empty string is an empty list.
#[derive(Debug, Clone)]
pub struct StringToList {
    separator: String,
}

impl StringToList {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl DecodeHook for StringToList {
    fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String> {
        match (value, target) {
            (Value::String(s), LeafKind::List) if s.is_empty() => Ok(Value::Sequence(Vec::new())),
            (Value::String(s), LeafKind::List) => Ok(Value::Sequence(
                s.split(self.separator.as_str())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            )),
            (value, _) => Ok(value),
        }
    }
}

/// RFC3339 strings into timestamps. An empty string is the zero timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339ToTimestamp;

impl DecodeHook for Rfc3339ToTimestamp {
    fn apply(&self, value: Value, target: LeafKind) -> Result<Value, String> {
        match (value, target) {
            (Value::String(s), LeafKind::Timestamp) => {
                let parsed = if s.is_empty() {
                    DateTime::<Utc>::default()
                } else {
                    DateTime::parse_from_rfc3339(&s)
                        .map_err(|e| format!("parsing time {s:?} as RFC3339: {e}"))?
                        .with_timezone(&Utc)
                };
                Ok(Value::Tagged(Box::new(TaggedValue {
                    tag: Tag::new(TIMESTAMP_TAG),
                    value: Value::String(parsed.to_rfc3339()),
                })))
            }
            (value, _) => Ok(value),
        }
    }
}

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a duration literal: a sequence of decimal numbers, each with an
/// optional fraction and a unit suffix (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`).
///
/// `"0"` is accepted without a unit. Negative durations are rejected.
///
/// ```
/// use std::time::Duration;
/// use stratum_config::parse_duration;
///
/// assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("").is_err());
/// ```
pub fn parse_duration(literal: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration {literal:?}");

    let mut rest = literal.strip_prefix('+').unwrap_or(literal);
    if rest.starts_with('-') {
        return Err(format!("negative duration {literal:?} is not allowed"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_fraction) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_fraction
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_fraction.len());
        let unit = &after_fraction[..unit_len];
        rest = &after_fraction[unit_len..];
        if unit.is_empty() {
            return Err(format!("missing unit in duration {literal:?}"));
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit {unit:?} in duration {literal:?}"))?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(invalid)?;
        nanos = nanos
            .checked_add(fraction_nanos(fraction, scale))
            .ok_or_else(invalid)?;
        total = total.checked_add(nanos).ok_or_else(invalid)?;
    }

    let total = u64::try_from(total).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(total))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Nanoseconds contributed by the fractional digits of a component.
fn fraction_nanos(digits: &str, scale: u128) -> u128 {
    let mut value: u128 = 0;
    let mut denominator: u128 = 1;
    // Digits past 18 places cannot change a nanosecond result.
    for digit in digits.bytes().take(18) {
        value = value * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    value * scale / denominator
}
