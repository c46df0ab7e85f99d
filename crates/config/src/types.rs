//! Built-in configuration sections.

use crate::loader::{ConfigError, Loader};
use crate::schema::{Configurable, Field, Reflect};

/// Settings of the configuration subsystem itself, bound under `core.config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    /// Environment variable prefix the service was configured with.
    pub env_prefix: String,
}

impl Reflect for CoreConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::leaf("EnvPrefix", &mut self.env_prefix).key("env_prefix")]
    }
}

impl Configurable for CoreConfig {
    fn prefix(&self) -> &str {
        "core.config"
    }
}

impl CoreConfig {
    /// Bind the section from `loader`.
    pub fn load(loader: &Loader) -> Result<Self, ConfigError> {
        loader.load()
    }
}
