//! Defaults applier.
//!
//! Responsibilities:
//! - Set every leaf that is still at its zero value from its declared default literal.
//!
//! Does NOT handle:
//! - Deciding precedence between sources; by the time defaults run, decoding
//!   has already written every value any source supplied.
//!
//! Invariants:
//! - A non-zero value is never replaced, whether it came from a source or was
//!   pre-populated by the caller.
//! - Default literals always go through the standard hooks, whatever hooks the
//!   loader was built with.

use serde_yaml::Value;

use super::error::ConfigError;
use super::hooks::DecodeHooks;
use crate::schema::Reflect;
use crate::walk::walk_fields;

pub(crate) fn apply_defaults(target: &mut dyn Reflect, prefix: &str) -> Result<(), ConfigError> {
    let hooks = DecodeHooks::standard();
    walk_fields(target, prefix, |path, meta, leaf| {
        let Some(literal) = meta.default else {
            return Ok(());
        };
        if !leaf.is_zero() {
            return Ok(());
        }

        let default_error = |message: String| ConfigError::Default {
            key: path.full_key.clone(),
            message,
        };
        let coerced = hooks
            .apply(Value::String(literal.to_string()), leaf.kind())
            .map_err(default_error)?;
        leaf.decode(&coerced).map_err(|mismatch| {
            default_error(format!(
                "expected {}, got {}",
                mismatch.expected, mismatch.actual
            ))
        })?;
        tracing::trace!(key = %path.full_key, "applied default");
        Ok(())
    })
}
