//! Source layer store: the merged key space of configuration documents.
//!
//! Responsibilities:
//! - Locate configuration files on the search paths and parse them as YAML.
//! - Deep-merge documents in load order (base first, overlay on top).
//! - Expose the merged space as flat, lower-cased dotted keys.
//!
//! Does NOT handle:
//! - Environment variables (see `bind.rs`, which consults them on every read).
//! - Decoding values into typed fields (see `decode.rs`).
//!
//! Invariants:
//! - Missing files are skipped; unreadable or unparsable files are errors.
//! - Mapping keys are lower-cased while merging, so lookups are case-insensitive.
//! - A later document's value replaces an earlier one for the same key, except
//!   that mappings merge recursively and a null never erases an existing value.
//! - The store is never mutated after the loader is built.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use super::error::ConfigError;
use crate::constants::CONFIG_FILE_EXTENSIONS;
use crate::leaf::scalar_to_string;

#[derive(Default, Clone)]
pub(crate) struct SourceStore {
    merged: Mapping,
    flat: BTreeMap<String, Value>,
    files: Vec<PathBuf>,
}

// Values may be file secrets: show only the shape of the store.
impl std::fmt::Debug for SourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStore")
            .field("key_count", &self.flat.len())
            .field("files", &self.files)
            .finish()
    }
}

impl SourceStore {
    /// Merge the first file named `name` found on `paths`, if any.
    ///
    /// Returns the path that was merged.
    pub(crate) fn merge_named(
        &mut self,
        paths: &[PathBuf],
        name: &str,
    ) -> Result<Option<PathBuf>, ConfigError> {
        let Some(path) = find_config_file(paths, name) else {
            tracing::debug!(name, "no config file found on search paths");
            return Ok(None);
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::ConfigFileRead { path, source }),
        };

        let document = parse_document(&contents).map_err(|message| ConfigError::ConfigFileParse {
            path: path.clone(),
            message,
        })?;
        self.merge(document);
        tracing::debug!(path = %path.display(), "merged config file");
        self.files.push(path.clone());
        Ok(Some(path))
    }

    /// Merge a document read from `reader`.
    pub(crate) fn merge_reader<R: Read>(&mut self, mut reader: R) -> Result<(), ConfigError> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|e| ConfigError::ReaderParse {
                message: e.kind().to_string(),
            })?;
        let document = parse_document(&contents).map_err(|message| ConfigError::ReaderParse { message })?;
        self.merge(document);
        Ok(())
    }

    pub(crate) fn merge(&mut self, document: Mapping) {
        merge_mapping(&mut self.merged, document);
        self.flat.clear();
        flatten_into("", &self.merged, &mut self.flat);
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.flat.get(key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.flat.contains_key(key)
    }

    /// Every leaf key, sorted.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &String> {
        self.flat.keys()
    }

    /// Files merged so far, in load order.
    pub(crate) fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// First existing `<path>/<name>.<ext>` in search-path then extension order.
fn find_config_file(paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    paths.iter().find_map(|dir| {
        CONFIG_FILE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|candidate| candidate.is_file())
    })
}

/// Parse a YAML (or JSON) document into a lower-cased mapping.
///
/// An empty document is an empty mapping. Error messages carry only the
/// position of the failure.
fn parse_document(contents: &str) -> Result<Mapping, String> {
    let value: Value = serde_yaml::from_str(contents).map_err(|e| match e.location() {
        Some(loc) => format!("invalid syntax at line {}, column {}", loc.line(), loc.column()),
        None => "invalid syntax".to_string(),
    })?;

    match lowercase_keys(value) {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err("top-level document must be a mapping".to_string()),
    }
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => {
            let mut out = Mapping::with_capacity(mapping.len());
            for (k, v) in mapping {
                let Some(key) = scalar_to_string(&k) else {
                    tracing::warn!("skipping config entry with a non-scalar key");
                    continue;
                };
                out.insert(Value::String(key.to_lowercase()), lowercase_keys(v));
            }
            Value::Mapping(out)
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

fn merge_mapping(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) => {
                if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                    merge_mapping(existing, incoming);
                } else {
                    base.insert(key, Value::Mapping(incoming));
                }
            }
            Value::Null if base.contains_key(&key) => {}
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn flatten_into(prefix: &str, mapping: &Mapping, out: &mut BTreeMap<String, Value>) {
    for (key, value) in mapping {
        let Some(segment) = key.as_str() else { continue };
        let full = if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        };
        match value {
            Value::Mapping(inner) if inner.is_empty() => {}
            Value::Mapping(inner) => flatten_into(&full, inner, out),
            leaf => {
                out.insert(full, leaf.clone());
            }
        }
    }
}
