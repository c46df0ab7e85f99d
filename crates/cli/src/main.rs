//! stratum-config - inspect layered service configuration from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Build a `Loader` from files, environment and global options.
//! - Show merged keys, resolved values, variable names and merged files.
//!
//! Does NOT handle:
//! - Binding typed sections; services do that through the library.
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide
//!   `CONFIG_PATHS`, `ENV_PREFIX`, `APP_ENV` and key variables.
//! - Logs go to stderr; stdout carries command output only.

mod args;
mod dispatch;
mod error;
mod formatters;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use stratum_config::LoaderBuilder;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Load .env file BEFORE CLI parsing
    let builder = match LoaderBuilder::new().load_dotenv() {
        Ok(builder) => builder,
        Err(e) => {
            eprintln!("Failed to load environment: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = cli
        .apply(builder)
        .build()
        .context("Failed to load configuration")
        .and_then(|loader| {
            tracing::debug!(
                env_prefix = %loader.env_prefix(),
                files = loader.files().len(),
                "loader ready"
            );
            run_command(&cli, &loader)
        });

    let exit_code = match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
