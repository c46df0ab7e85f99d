//! Layered configuration loader.
//!
//! Responsibilities:
//! - Merge a base file and an optional overlay file into one key space.
//! - Resolve keys against explicit env aliases, automatic env variables and files.
//! - Bind `Configurable` sections: reconstruct, decode, apply defaults, validate.
//!
//! Does NOT handle:
//! - Describing struct fields (see `schema.rs` and `walk.rs`).
//! - Watching files or reloading; sources are read once per loader.
//!
//! Invariants / Assumptions:
//! - Precedence, highest first: alias variables, automatic variables (for keys
//!   the files define), overlay file, base file, field defaults.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod aliases;
mod bind;
mod builder;
mod decode;
mod defaults;
mod env;
mod error;
mod hooks;
mod nested;
mod store;
mod validate;

#[cfg(test)]
mod tests;

pub use bind::{Loader, Resolved, Source};
pub use builder::{LoaderBuilder, LoaderConfig};
pub use env::env_var_or_none;
pub use error::{ConfigError, FieldViolation, ValidationErrors};
pub use hooks::{DecodeHook, DecodeHooks, Rfc3339ToTimestamp, StringToDuration, StringToList, parse_duration};
