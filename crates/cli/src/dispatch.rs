//! Command dispatch and execution logic.
//!
//! Responsibilities:
//! - Route parsed subcommands to their handlers against a built `Loader`.
//! - Write formatted output to stdout.
//!
//! Does NOT handle:
//! - Argument parsing (see `args` module).
//! - Loader construction (see `main`).

use anyhow::{Context, Result};
use stratum_config::key::normalize_key;
use stratum_config::{ConfigError, Loader};

use crate::args::{Cli, Commands};
use crate::error::KeyNotFound;
use crate::formatters::{
    EnvNameOutput, ValueOutput, format_env_name, format_files, format_keys, format_value,
};

/// Run the selected subcommand.
pub fn run_command(cli: &Cli, loader: &Loader) -> Result<()> {
    let output = match &cli.command {
        Commands::Keys { prefix } => {
            let keys = filter_keys(loader.keys(), prefix.as_deref());
            format_keys(cli.output, &keys)?
        }
        Commands::Get { key, env } => {
            let names: Vec<&str> = env.iter().map(String::as_str).collect();
            if !names.is_empty() {
                loader
                    .bind_env(key, &names)
                    .with_context(|| format!("Failed to register environment aliases for '{key}'"))?;
            }
            let resolved = loader.resolve(key).ok_or_else(|| KeyNotFound {
                key: normalize_key(key),
            })?;
            let value = ValueOutput::new(&normalize_key(key), &resolved, cli.reveal)?;
            format_value(cli.output, &value)?
        }
        Commands::EnvName { key } => {
            let normalized = normalize_key(key);
            if normalized.is_empty() {
                return Err(ConfigError::EmptyKey.into());
            }
            let env_name = loader.env_name(&normalized);
            format_env_name(
                cli.output,
                &EnvNameOutput {
                    key: normalized,
                    env_name,
                },
            )?
        }
        Commands::Files => format_files(cli.output, loader.files())?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Keep `keys` equal to `prefix` or nested below it.
fn filter_keys(keys: Vec<String>, prefix: Option<&str>) -> Vec<String> {
    let Some(prefix) = prefix.map(normalize_key).filter(|p| !p.is_empty()) else {
        return keys;
    };
    let scope = format!("{prefix}.");
    keys.into_iter()
        .filter(|key| *key == prefix || key.starts_with(&scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        ["db.host", "db.pool.size", "dbx.name", "server.port"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_filter_keys_by_segment_prefix() {
        assert_eq!(filter_keys(keys(), Some("DB")), vec!["db.host", "db.pool.size"]);
        assert_eq!(filter_keys(keys(), Some("db.pool")), vec!["db.pool.size"]);
    }

    #[test]
    fn test_filter_keys_without_prefix() {
        assert_eq!(filter_keys(keys(), None).len(), 4);
        assert_eq!(filter_keys(keys(), Some("  ")).len(), 4);
    }
}
