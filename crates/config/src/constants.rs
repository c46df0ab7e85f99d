//! Centralized constants for the configuration loader.
//!
//! Environment variable names and hard-coded fallbacks live here so that the
//! loader, the CLI, and the tests agree on them.

// =============================================================================
// Search paths and files
// =============================================================================

/// Default directory searched for configuration files.
pub const DEFAULT_CONFIG_PATH: &str = "./configs";

/// Base configuration file name (without extension).
pub const BASE_CONFIG_FILE: &str = "base";

/// File extensions probed, in order, for every configuration file name.
///
/// JSON documents are parsed with the YAML parser.
pub const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

// =============================================================================
// Environment variables read by the loader
// =============================================================================

/// Comma-separated list of search paths.
pub const ENV_CONFIG_PATHS: &str = "CONFIG_PATHS";

/// Selects the environment-specific overlay file (e.g. `dev` -> `dev.yaml`).
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Global override for the environment variable prefix.
pub const ENV_PREFIX: &str = "ENV_PREFIX";

// =============================================================================
// Environment variable naming
// =============================================================================

/// Default prefix for automatic environment variable names.
pub const DEFAULT_ENV_PREFIX: &str = "STRATUM";

/// Separator between dotted key segments.
pub const KEY_SEPARATOR: char = '.';

/// Default `(from, to)` substitutions turning a dotted key into a variable name.
pub const DEFAULT_ENV_REPLACEMENTS: &[(&str, &str)] = &[(".", "_"), ("-", "_")];

/// Separator used by the comma-list decode hook.
pub const DEFAULT_LIST_SEPARATOR: &str = ",";

/// Placeholder rendered instead of sensitive values.
pub const REDACTED: &str = "[redacted]";
