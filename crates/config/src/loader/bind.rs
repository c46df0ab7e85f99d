//! The configuration loader: source precedence and the bind pipeline.
//!
//! Responsibilities:
//! - Resolve a single key against aliases, automatic environment variables and files.
//! - Register explicit environment aliases (`bind_env`).
//! - Bind a `Configurable` section: collect keys, reconstruct, decode, apply
//!   defaults, validate.
//!
//! Does NOT handle:
//! - Reading files or resolving construction options (see `builder.rs`).
//!
//! Invariants / Assumptions:
//! - A key with registered aliases is satisfied only by those aliases (first set
//!   variable wins) or, failing that, by the files.
//! - A key without aliases is satisfied by its automatic variable only when the
//!   files define it; otherwise implicit environment overrides do not apply.
//! - Environment variables are read at resolve time, never cached.
//! - `bind` takes `&self`: the store is read-only, and alias registration is
//!   serialized inside `AliasRegistry`, so one loader can serve many threads.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_yaml::Value;

use super::aliases::AliasRegistry;
use super::builder::{LoaderBuilder, LoaderConfig};
use super::decode::decode_into;
use super::defaults::apply_defaults;
use super::env::{env_value, first_set};
use super::error::ConfigError;
use super::nested::NestedMap;
use super::store::SourceStore;
use super::validate::validate;
use crate::key::normalize_key;
use crate::redact::display_value;
use crate::schema::Configurable;
use crate::walk::leaf_keys;

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An explicitly registered alias variable.
    Alias(String),
    /// The automatically derived variable of a key the files define.
    Env(String),
    /// The merged configuration files.
    File,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Alias(name) => write!(f, "env alias {name}"),
            Source::Env(name) => write!(f, "env {name}"),
            Source::File => f.write_str("file"),
        }
    }
}

/// A key's effective value and the source that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: Source,
}

/// Layered configuration loader.
///
/// Built once (see `LoaderBuilder`), then shared: every method takes `&self`.
pub struct Loader {
    config: LoaderConfig,
    store: SourceStore,
    pub(super) aliases: AliasRegistry,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("env_prefix", &self.config.env_prefix)
            .field("store", &self.store)
            .field("alias_count", &self.aliases.len())
            .finish()
    }
}

impl Loader {
    /// Build a loader from the environment and the defaults.
    pub fn new() -> Result<Self, ConfigError> {
        LoaderBuilder::new().build()
    }

    pub(crate) fn from_parts(config: LoaderConfig, store: SourceStore) -> Self {
        Self {
            config,
            store,
            aliases: AliasRegistry::default(),
        }
    }

    /// The resolved construction settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn env_prefix(&self) -> &str {
        &self.config.env_prefix
    }

    /// Configuration files merged at construction, in load order.
    pub fn files(&self) -> &[PathBuf] {
        self.store.files()
    }

    /// Automatic environment variable name for `key`.
    pub fn env_name(&self, key: &str) -> String {
        self.config
            .replacer
            .env_name(&self.config.env_prefix, &normalize_key(key))
    }

    /// Register explicit environment variables for `key`.
    ///
    /// With no `names`, the automatic name is the only alias. Otherwise `names`
    /// are kept in order and the automatic name is appended unless already
    /// present (compared case-insensitively). Registering a key again replaces
    /// its aliases.
    pub fn bind_env(&self, key: &str, names: &[&str]) -> Result<(), ConfigError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        let automatic = self.env_name(&key);
        let mut aliases: Vec<String> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if !aliases.iter().any(|name| name.eq_ignore_ascii_case(&automatic)) {
            aliases.push(automatic);
        }

        tracing::debug!(key = %key, aliases = ?aliases, "registered environment aliases");
        self.aliases.register(key, aliases);
        Ok(())
    }

    /// Register the automatic alias for every leaf of `target`.
    ///
    /// Keys that already have aliases keep them. Returns the number of newly
    /// registered keys.
    pub fn bind_struct_env<T: Configurable>(&self, target: &mut T) -> Result<usize, ConfigError> {
        let prefix = normalize_key(target.prefix());
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let mut registered = 0;
        for key in leaf_keys(target, &prefix)? {
            if self.aliases.aliases(&normalize_key(&key)).is_none() {
                self.bind_env(&key, &[])?;
                registered += 1;
            }
        }
        Ok(registered)
    }

    /// Resolve `key` to its effective value.
    ///
    /// Returns `None` when no source supplies a non-null value.
    pub fn resolve(&self, key: &str) -> Option<Resolved> {
        let key = normalize_key(key);
        if key.is_empty() {
            return None;
        }

        if let Some(aliases) = self.aliases.aliases(&key) {
            if let Some((name, value)) = first_set(&aliases) {
                return Some(Resolved {
                    value: Value::String(value),
                    source: Source::Alias(name),
                });
            }
        } else if self.store.contains(&key) {
            let name = self.env_name(&key);
            if let Some(value) = env_value(&name) {
                return Some(Resolved {
                    value: Value::String(value),
                    source: Source::Env(name),
                });
            }
        }

        self.store
            .get(&key)
            .filter(|value| !value.is_null())
            .map(|value| Resolved {
                value: value.clone(),
                source: Source::File,
            })
    }

    /// Effective value of `key`, if any source supplies one.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.resolve(key).map(|resolved| resolved.value)
    }

    /// Every known key: file keys plus registered alias keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: BTreeSet<String> = self.store.keys().cloned().collect();
        keys.extend(self.aliases.keys_with_prefix(""));
        keys.into_iter().collect()
    }

    /// Populate `target` from every source, then apply defaults and validate.
    ///
    /// Keys no source supplies leave the corresponding field as it was. On error
    /// the target may be partially decoded and must be discarded.
    pub fn bind<T: Configurable>(&self, target: &mut T) -> Result<(), ConfigError> {
        let prefix = normalize_key(target.prefix());
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        let scope = format!("{prefix}.");

        let mut keys: BTreeSet<String> = self
            .store
            .keys()
            .filter(|key| key.starts_with(&scope))
            .cloned()
            .collect();
        keys.extend(self.aliases.keys_with_prefix(&scope));

        let mut tree = NestedMap::default();
        for key in &keys {
            let relative = &key[scope.len()..];
            if relative.is_empty() {
                continue;
            }
            if let Some(resolved) = self.resolve(key) {
                tracing::trace!(
                    key = %key,
                    source = %resolved.source,
                    value = %display_value(key, &resolved.value),
                    "resolved key"
                );
                tree.insert(relative, resolved.value);
            }
        }
        tracing::debug!(
            prefix = %prefix,
            keys = keys.len(),
            empty = tree.is_empty(),
            "binding configuration section"
        );

        decode_into(&mut *target, &prefix, &tree, &self.config.hooks)?;
        apply_defaults(&mut *target, &prefix)?;
        validate(&mut *target, &prefix)?;
        Ok(())
    }

    /// Bind a fresh `T::default()`.
    pub fn load<T: Configurable + Default>(&self) -> Result<T, ConfigError> {
        let mut target = T::default();
        self.bind(&mut target)?;
        Ok(target)
    }
}
