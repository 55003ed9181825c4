//! Run configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. a TOML file (`monsync.toml` in the working directory if present, or
//!    the path given with `--config`, which must exist)
//! 3. environment variables prefixed with `MONSYNC_`, using `__` between
//!    sections, e.g. `MONSYNC_DATADOG__API_KEY`
//!
//! ```toml
//! input = "threshold_sample.csv"
//!
//! [datadog]
//! endpoint = "https://api.datadoghq.com"
//! api_key = "..."
//! app_key = "..."
//! timeout_secs = 30
//! accept_invalid_certs = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use monsync_adapters::datadog::{DatadogClient, DEFAULT_ENDPOINT};
use serde::Deserialize;

use crate::error::{Result, SyncError};

/// Threshold table read when nothing else is configured.
pub const DEFAULT_INPUT: &str = "threshold_sample.csv";

/// Config file looked up (without extension) in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "monsync";

const ENV_PREFIX: &str = "MONSYNC";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the threshold table.
    pub input: PathBuf,
    pub datadog: DatadogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatadogSettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
}

impl Settings {
    /// Load settings from defaults, the config file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_path, environment())
    }

    fn from_sources(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("input", DEFAULT_INPUT)?
            .set_default("datadog.endpoint", DEFAULT_ENDPOINT)?
            .set_default("datadog.timeout_secs", 30_i64)?
            .set_default("datadog.accept_invalid_certs", false)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

impl DatadogSettings {
    /// Whether both keys are configured.
    pub fn has_credentials(&self) -> bool {
        let present = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.trim().is_empty());
        present(&self.api_key) && present(&self.app_key)
    }

    /// Build a client for these settings.
    pub fn connect(&self) -> Result<DatadogClient> {
        if !self.has_credentials() {
            return Err(SyncError::Config {
                details: "datadog.api_key and datadog.app_key are required".to_string(),
            });
        }

        let mut builder = DatadogClient::builder()
            .endpoint(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs))
            .accept_invalid_certs(self.accept_invalid_certs);
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(key) = &self.app_key {
            builder = builder.app_key(key);
        }

        builder.build().map_err(|e| SyncError::Config {
            details: e.to_string(),
        })
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
