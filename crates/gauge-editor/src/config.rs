//! Client configuration
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional file (format detected from its extension), then environment
//! variables prefixed with `GAUGE_EDITOR_` (`__` separates nested keys).

use config::{Config as Cfg, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "GAUGE_EDITOR";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect configuration format from file extension
pub fn detect_format(path: &Path) -> ConfigResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

    match ext.as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Connection settings for the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:4000`
    pub base_url: String,
    /// Monitored server the gauges belong to
    pub server_id: String,
    pub request_timeout_secs: u64,
    /// Upper bound on MBean name suggestions per lookup
    pub suggestion_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            server_id: String::new(),
            request_timeout_secs: 30,
            suggestion_limit: 10,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from defaults, an optional file and `GAUGE_EDITOR_*` variables.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_env(path, ENV_PREFIX)
    }

    pub fn load_with_env(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = Cfg::builder();

        if let Some(path) = path {
            let format = detect_format(path)?;
            let content = std::fs::read_to_string(path)?;
            builder = builder.add_source(File::from_str(&content, format));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_server_id(mut self, server_id: &str) -> Self {
        self.server_id = server_id.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url cannot be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
