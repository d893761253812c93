//! CLI settings
//!
//! Loaded from an optional `interpose.toml` (or `.json`/`.yaml`) in the
//! working directory, then `INTERPOSE_*` environment variables. Command-line
//! flags override both.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print reports as JSON.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("interpose")
    }

    /// Load with `file` as the base name of the optional settings file.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("INTERPOSE"))
            .build()?
            .try_deserialize()
    }
}
