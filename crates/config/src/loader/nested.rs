//! Nested reconstructor: rebuilds a tree from flat dotted keys.
//!
//! Responsibilities:
//! - Turn `(relative_key, value)` pairs such as `a.b.c = 1` into `{a: {b: {c: 1}}}`.
//! - Answer path lookups for the decoder.
//!
//! Does NOT handle:
//! - Choosing which source supplies a value (see `bind.rs`).
//! - Converting values into field types (see `decode.rs`).
//!
//! Invariants:
//! - First writer wins at the container level: when an intermediate segment
//!   already holds a value, the deeper assignment is dropped (and logged).
//! - The final segment is always overwritten by the latest assignment.
//! - Keys are stored as given; callers pass normalized keys.

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::constants::KEY_SEPARATOR;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Value(Value),
    Branch(NestedMap),
}

/// Tree of resolved values below a bind prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NestedMap {
    entries: BTreeMap<String, Node>,
}

/// Outcome of looking up a field path in a `NestedMap`.
#[derive(Debug, PartialEq)]
pub(crate) enum Lookup<'a> {
    /// No source supplied the path.
    Missing,
    Value(&'a Value),
    /// The path ends at a subtree rather than a value.
    Branch,
    /// A value sits where the path expects a subtree; `depth` is the index of
    /// that segment.
    Blocked { depth: usize, value: &'a Value },
}

impl NestedMap {
    /// Insert `value` at the dotted `key`.
    ///
    /// Returns `false` when the assignment was dropped because an intermediate
    /// segment already holds a value.
    pub(crate) fn insert(&mut self, key: &str, value: Value) -> bool {
        let mut segments = key.split(KEY_SEPARATOR).peekable();
        let mut current = self;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.entries.insert(segment.to_string(), Node::Value(value));
                return true;
            }
            let node = current
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| Node::Branch(NestedMap::default()));
            match node {
                Node::Branch(inner) => current = inner,
                Node::Value(_) => {
                    tracing::warn!(
                        key,
                        segment,
                        "dropping nested assignment: intermediate key already holds a value"
                    );
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Lookup<'_> {
        let mut current = self;
        for (depth, segment) in path.iter().enumerate() {
            let last = depth + 1 == path.len();
            match current.entries.get(segment.as_ref()) {
                None => return Lookup::Missing,
                Some(Node::Value(value)) if last => return Lookup::Value(value),
                Some(Node::Value(value)) => return Lookup::Blocked { depth, value },
                Some(Node::Branch(_)) if last => return Lookup::Branch,
                Some(Node::Branch(inner)) => current = inner,
            }
        }
        Lookup::Branch
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for NestedMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = NestedMap::default();
        for (key, value) in iter {
            map.insert(key.as_ref(), value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nested_maps() {
        let map: NestedMap = [
            ("a.b.c", Value::from(1)),
            ("a.b.d", Value::from("x")),
            ("e", Value::from(true)),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.lookup(&["a", "b", "c"]), Lookup::Value(&Value::from(1)));
        assert_eq!(map.lookup(&["a", "b", "d"]), Lookup::Value(&Value::from("x")));
        assert_eq!(map.lookup(&["e"]), Lookup::Value(&Value::from(true)));
        assert_eq!(map.lookup(&["a", "b"]), Lookup::Branch);
        assert_eq!(map.lookup(&["a", "z"]), Lookup::Missing);
    }

    #[test]
    fn test_first_writer_wins_on_container_conflict() {
        let mut map = NestedMap::default();
        assert!(map.insert("a", Value::from("scalar")));
        assert!(!map.insert("a.b", Value::from(1)));

        assert_eq!(map.lookup(&["a"]), Lookup::Value(&Value::from("scalar")));
        assert_eq!(
            map.lookup(&["a", "b"]),
            Lookup::Blocked {
                depth: 0,
                value: &Value::from("scalar")
            }
        );
    }

    #[test]
    fn test_final_segment_is_overwritten() {
        let mut map = NestedMap::default();
        map.insert("a.b", Value::from(1));
        map.insert("a.b", Value::from(2));
        assert_eq!(map.lookup(&["a", "b"]), Lookup::Value(&Value::from(2)));

        // A scalar written over an existing subtree replaces it.
        map.insert("a", Value::from("flat"));
        assert_eq!(map.lookup(&["a"]), Lookup::Value(&Value::from("flat")));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        proptest! {
            #[test]
            fn prop_disjoint_keys_round_trip(
                entries in prop::collection::btree_map("[a-c]{1,2}(\\.[a-c]{1,2}){0,2}", 0i64..100, 0..12)
            ) {
                // Keep only keys that are not a proper prefix of another key,
                // so no container conflict can occur.
                let disjoint: BTreeMap<&String, &i64> = entries
                    .iter()
                    .filter(|(key, _)| {
                        let scope = format!("{key}.");
                        !entries.keys().any(|other| other.starts_with(&scope))
                    })
                    .collect();

                let map: NestedMap = disjoint
                    .iter()
                    .map(|(key, value)| (key.as_str(), Value::from(**value)))
                    .collect();

                for (key, value) in &disjoint {
                    let path: Vec<&str> = key.split('.').collect();
                    prop_assert_eq!(map.lookup(&path), Lookup::Value(&Value::from(**value)));
                }
            }
        }
    }
}
