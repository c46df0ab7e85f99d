//! Layered configuration resolution for services.
//!
//! This crate binds configuration from YAML files, environment variables and
//! compiled-in defaults into strongly typed sections, then validates them.
//!
//! ```no_run
//! use stratum_config::{Configurable, Field, Loader, Reflect};
//!
//! #[derive(Default)]
//! struct DbConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Reflect for DbConfig {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::leaf("Host", &mut self.host).default("localhost"),
//!             Field::leaf("Port", &mut self.port).default("5432").validate("min=1,max=65535"),
//!         ]
//!     }
//! }
//!
//! impl Configurable for DbConfig {
//!     fn prefix(&self) -> &str {
//!         "db"
//!     }
//! }
//!
//! let loader = Loader::new()?;
//! loader.bind_env("db.host", &["DATABASE_HOST"])?;
//! let db: DbConfig = loader.load()?;
//! # Ok::<(), stratum_config::ConfigError>(())
//! ```

pub mod constants;
pub mod key;
pub mod leaf;
mod loader;
pub mod redact;
pub mod schema;
pub mod types;
pub mod walk;

pub use leaf::{Leaf, LeafKind, Measure, Mismatch};
pub use loader::{
    ConfigError, DecodeHook, DecodeHooks, FieldViolation, Loader, LoaderBuilder, LoaderConfig,
    Resolved, Rfc3339ToTimestamp, Source, StringToDuration, StringToList, ValidationErrors,
    env_var_or_none, parse_duration,
};
pub use key::EnvKeyReplacer;
pub use schema::{Configurable, Field, FieldMeta, Reflect, Target};
pub use types::CoreConfig;
