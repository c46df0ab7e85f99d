//! Loader builder.
//!
//! Responsibilities:
//! - Collect construction options (search paths, env prefix, replacer, hooks, overlay name).
//! - Resolve each option against its environment override and hard-coded default.
//! - Read the base and overlay files once and hand the merged store to a `Loader`.
//! - Optionally load a `.env` file, gated by `DOTENV_DISABLED`.
//!
//! Does NOT handle:
//! - Resolving keys or binding structs (see `bind.rs`).
//! - File lookup and merge rules (see `store.rs`).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, which take
//!   precedence over the defaults in `constants.rs`.
//! - Missing configuration files are tolerated; malformed ones abort `build()`.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::io::Read;
use std::path::PathBuf;

use super::bind::Loader;
use super::env::{env_var_or_none, parse_path_list};
use super::error::ConfigError;
use super::hooks::DecodeHooks;
use super::store::SourceStore;
use crate::constants::{
    BASE_CONFIG_FILE, DEFAULT_CONFIG_PATH, DEFAULT_ENV_PREFIX, ENV_APP_ENV, ENV_CONFIG_PATHS,
    ENV_PREFIX,
};
use crate::key::EnvKeyReplacer;

/// Construction-time settings of a `Loader`, immutable once built.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directories searched, in order, for configuration files.
    pub config_paths: Vec<PathBuf>,
    /// Prefix of automatically derived environment variable names.
    pub env_prefix: String,
    /// Name of the overlay file merged over the base file, if any.
    pub app_env: Option<String>,
    pub replacer: EnvKeyReplacer,
    pub hooks: DecodeHooks,
}

/// Builder for a `Loader`.
///
/// ```no_run
/// use stratum_config::LoaderBuilder;
///
/// let loader = LoaderBuilder::new()
///     .with_config_paths(["./configs"])
///     .with_env_prefix("MYAPP")
///     .build()?;
/// # Ok::<(), stratum_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct LoaderBuilder {
    config_paths: Option<Vec<PathBuf>>,
    env_prefix: Option<String>,
    app_env: Option<String>,
    replacer: EnvKeyReplacer,
    hooks: DecodeHooks,
}

impl LoaderBuilder {
    /// Create a builder with the default replacer and the standard decode hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the search paths, overriding `CONFIG_PATHS`.
    ///
    /// Blank entries are dropped; an empty list leaves the override unset.
    pub fn with_config_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty())
            .collect();
        self.config_paths = (!paths.is_empty()).then_some(paths);
        self
    }

    /// Set the environment variable prefix, overriding `ENV_PREFIX`.
    ///
    /// A blank prefix is ignored.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim().to_string();
        if !prefix.is_empty() {
            self.env_prefix = Some(prefix);
        }
        self
    }

    /// Set the key-to-variable-name substitutions.
    pub fn with_env_key_replacer(mut self, replacer: EnvKeyReplacer) -> Self {
        self.replacer = replacer;
        self
    }

    /// Replace the decode hook chain.
    pub fn with_decode_hooks(mut self, hooks: DecodeHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set the overlay file name, overriding `APP_ENV`.
    pub fn with_app_env(mut self, app_env: impl Into<String>) -> Self {
        let app_env = app_env.into().trim().to_string();
        if !app_env.is_empty() {
            self.app_env = Some(app_env);
        }
        self
    }

    /// Resolve every option against the environment and the defaults.
    pub fn resolve_config(self) -> LoaderConfig {
        let config_paths = self
            .config_paths
            .or_else(|| {
                env_var_or_none(ENV_CONFIG_PATHS)
                    .map(|raw| parse_path_list(&raw))
                    .filter(|paths| !paths.is_empty())
            })
            .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_CONFIG_PATH)]);

        let env_prefix = self
            .env_prefix
            .or_else(|| env_var_or_none(ENV_PREFIX))
            .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string());

        let app_env = self.app_env.or_else(|| env_var_or_none(ENV_APP_ENV));

        LoaderConfig {
            config_paths,
            env_prefix,
            app_env,
            replacer: self.replacer,
            hooks: self.hooks,
        }
    }

    /// Read the base file and the overlay file, then build the loader.
    pub fn build(self) -> Result<Loader, ConfigError> {
        let config = self.resolve_config();
        let mut store = SourceStore::default();

        store.merge_named(&config.config_paths, BASE_CONFIG_FILE)?;
        if let Some(app_env) = &config.app_env {
            store.merge_named(&config.config_paths, app_env)?;
        }

        tracing::debug!(
            env_prefix = %config.env_prefix,
            app_env = config.app_env.as_deref().unwrap_or(""),
            files = store.files().len(),
            "configuration loader built"
        );
        Ok(Loader::from_parts(config, store))
    }

    /// Build the loader from a single document instead of the search paths.
    ///
    /// Search paths and the overlay name are ignored.
    pub fn build_from_reader<R: Read>(self, reader: R) -> Result<Loader, ConfigError> {
        let config = self.resolve_config();
        let mut store = SourceStore::default();
        store.merge_reader(reader)?;
        tracing::debug!(env_prefix = %config.env_prefix, "configuration loader built from reader");
        Ok(Loader::from_parts(config, store))
    }
}
