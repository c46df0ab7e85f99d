//! Validator: evaluates declared field constraints after defaults are applied.
//!
//! Responsibilities:
//! - Parse comma-separated constraint lists (`required,min=1,max=65535`).
//! - Check every constrained leaf and collect all violations of one bind call.
//!
//! Does NOT handle:
//! - Cross-field constraints; every rule sees a single field.
//!
//! Invariants:
//! - Within a field, evaluation stops at the first failing rule.
//! - `omitempty` skips the remaining rules of a zero-valued field.
//! - Numeric rules compare numbers for numeric leaves and lengths for strings,
//!   lists, paths and secrets. Duration bounds may be written as duration literals.
//! - Violation messages never include the field's value.

use super::error::{ConfigError, FieldViolation, ValidationErrors};
use super::hooks::parse_duration;
use crate::leaf::{Leaf, LeafKind, Measure};
use crate::schema::Reflect;
use crate::walk::walk_fields;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Min,
    Max,
    Gt,
    Gte,
    Lt,
    Lte,
    Len,
}

impl Comparison {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "min" => Comparison::Min,
            "max" => Comparison::Max,
            "gt" => Comparison::Gt,
            "gte" => Comparison::Gte,
            "lt" => Comparison::Lt,
            "lte" => Comparison::Lte,
            "len" => Comparison::Len,
            _ => return None,
        })
    }

    fn holds(self, actual: f64, bound: f64) -> bool {
        match self {
            Comparison::Min | Comparison::Gte => actual >= bound,
            Comparison::Max | Comparison::Lte => actual <= bound,
            Comparison::Gt => actual > bound,
            Comparison::Lt => actual < bound,
            Comparison::Len => actual == bound,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Comparison::Min | Comparison::Gte => "at least",
            Comparison::Max | Comparison::Lte => "at most",
            Comparison::Gt => "greater than",
            Comparison::Lt => "less than",
            Comparison::Len => "exactly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Rule {
    Required,
    OmitEmpty,
    Compare { op: Comparison, bound: f64 },
    OneOf(Vec<String>),
}

/// A parsed rule together with its source text.
#[derive(Debug, Clone, PartialEq)]
struct ParsedRule<'a> {
    text: &'a str,
    param: &'a str,
    rule: Rule,
}

fn parse_rules<'a>(key: &str, rules: &'a str, kind: LeafKind) -> Result<Vec<ParsedRule<'a>>, ConfigError> {
    rules
        .split(',')
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| {
            let (name, param) = match text.split_once('=') {
                Some((name, param)) => (name.trim(), Some(param.trim())),
                None => (text, None),
            };
            let invalid = |message: &str| ConfigError::InvalidRule {
                key: key.to_string(),
                rule: text.to_string(),
                message: message.to_string(),
            };

            let rule = match (name, param) {
                ("required", None) => Rule::Required,
                ("omitempty", None) => Rule::OmitEmpty,
                ("required" | "omitempty", Some(_)) => return Err(invalid("takes no parameter")),
                ("oneof", Some(values)) => {
                    Rule::OneOf(values.split_whitespace().map(str::to_string).collect())
                }
                ("oneof", None) => return Err(invalid("missing parameter")),
                (name, param) => {
                    let op = Comparison::from_name(name).ok_or_else(|| invalid("unknown rule"))?;
                    let param = param.ok_or_else(|| invalid("missing parameter"))?;
                    let bound = parse_bound(param, kind)
                        .ok_or_else(|| invalid("parameter is not a number"))?;
                    Rule::Compare { op, bound }
                }
            };
            Ok(ParsedRule {
                text,
                param: param.unwrap_or_default(),
                rule,
            })
        })
        .collect()
}

/// Numeric bound of a comparison rule. Duration leaves also accept literals like `1s`.
fn parse_bound(param: &str, kind: LeafKind) -> Option<f64> {
    if kind == LeafKind::Duration {
        if let Ok(d) = parse_duration(param) {
            return Some(d.as_nanos() as f64);
        }
    }
    param.parse::<f64>().ok()
}

fn check_field(key: &str, leaf: &dyn Leaf, rules: &[ParsedRule<'_>]) -> Option<FieldViolation> {
    let violation = |rule: &ParsedRule<'_>, message: String| FieldViolation {
        key: key.to_string(),
        rule: rule.text.to_string(),
        message,
    };

    for parsed in rules {
        match &parsed.rule {
            Rule::OmitEmpty if leaf.is_zero() => return None,
            Rule::OmitEmpty => {}
            Rule::Required if leaf.is_zero() => {
                return Some(violation(parsed, "is required".to_string()));
            }
            Rule::Required => {}
            Rule::Compare { op, bound } => {
                let measure = leaf.measure();
                if !op.holds(measure.as_f64(), *bound) {
                    let subject = match measure {
                        Measure::Number(_) => "must be",
                        Measure::Length(_) => "length must be",
                    };
                    let message = format!("{subject} {} {}", op.describe(), parsed.param);
                    return Some(violation(parsed, message));
                }
            }
            Rule::OneOf(allowed) => {
                let text = leaf.text();
                if !allowed.iter().any(|candidate| *candidate == text) {
                    let message = format!("must be one of [{}]", allowed.join(" "));
                    return Some(violation(parsed, message));
                }
            }
        }
    }
    None
}

/// Check every constrained leaf of `target`, collecting all violations.
pub(crate) fn validate(target: &mut dyn Reflect, prefix: &str) -> Result<(), ConfigError> {
    let mut errors = ValidationErrors::default();
    walk_fields(target, prefix, |path, meta, leaf| {
        let Some(rules) = meta.validate else {
            return Ok(());
        };
        let rules = parse_rules(&path.full_key, rules, leaf.kind())?;
        if let Some(violation) = check_field(&path.full_key, leaf, &rules) {
            tracing::debug!(key = %violation.key, rule = %violation.rule, "constraint violated");
            errors.push(violation);
        }
        Ok(())
    })?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
