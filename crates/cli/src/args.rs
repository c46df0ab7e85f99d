//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Translate global options into `LoaderBuilder` settings.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read `CONFIG_PATHS`, `ENV_PREFIX` or `APP_ENV`; the loader does,
//!   so options given here take precedence over them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stratum_config::LoaderBuilder;

use crate::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "stratum-config")]
#[command(about = "Inspect layered service configuration", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  stratum-config keys --prefix db\n  stratum-config --app-env prod get server.port\n  stratum-config get db.dsn --env DATABASE_URL\n  stratum-config env-name db.pool-size\n  stratum-config -o json files\n"
)]
pub struct Cli {
    /// Directory searched for configuration files (repeatable, in order).
    ///
    /// Overrides the CONFIG_PATHS environment variable.
    #[arg(long = "config-path", global = true, value_name = "DIR")]
    pub config_paths: Vec<PathBuf>,

    /// Prefix of automatic environment variable names (overrides ENV_PREFIX)
    #[arg(long, global = true)]
    pub env_prefix: Option<String>,

    /// Overlay file merged over the base file (overrides APP_ENV)
    #[arg(long, global = true)]
    pub app_env: Option<String>,

    /// Show values of sensitive keys instead of masking them
    #[arg(long, global = true)]
    pub reveal: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every key known to the loader
    Keys {
        /// Only list keys under this dotted prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Show the effective value of a key and where it came from
    Get {
        /// Dotted configuration key (e.g. server.port)
        key: String,

        /// Environment variable to consult for the key (repeatable, first set wins)
        #[arg(long = "env", value_name = "VAR")]
        env: Vec<String>,
    },

    /// Print the automatic environment variable name of a key
    EnvName {
        /// Dotted configuration key
        key: String,
    },

    /// List the configuration files that were merged, in load order
    Files,
}

impl Cli {
    /// Apply the global options to `builder`.
    ///
    /// Blank values are ignored by the builder, so they fall back to the
    /// environment like absent ones.
    pub fn apply(&self, mut builder: LoaderBuilder) -> LoaderBuilder {
        if !self.config_paths.is_empty() {
            builder = builder.with_config_paths(self.config_paths.iter().cloned());
        }
        if let Some(prefix) = &self.env_prefix {
            builder = builder.with_env_prefix(prefix.as_str());
        }
        if let Some(app_env) = &self.app_env {
            builder = builder.with_app_env(app_env.as_str());
        }
        builder
    }
}
