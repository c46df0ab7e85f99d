//! Alias registry: explicit environment variable names per configuration key.
//!
//! Responsibilities:
//! - Store, per normalized key, the ordered list of variable names that may supply it.
//! - Serialize registrations against concurrent lookups.
//!
//! Does NOT handle:
//! - Computing the automatic variable name (see `Loader::bind_env`).
//! - Reading the environment (see `env.rs`).
//!
//! Invariants:
//! - Registering a key again replaces its list (last registration wins).
//! - Lookups observe either the list before or after a concurrent registration,
//!   never a partially written one.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub(crate) struct AliasRegistry {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl AliasRegistry {
    pub(crate) fn register(&self, key: String, names: Vec<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, names);
    }

    pub(crate) fn aliases(&self, key: &str) -> Option<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Registered keys starting with `scope`, sorted.
    pub(crate) fn keys_with_prefix(&self, scope: &str) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|key| key.starts_with(scope))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
