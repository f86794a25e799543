use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com/products";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "catalog-explorer.log";

/// Runtime configuration, read from `config.json` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog endpoint returning `{ "products": [...] }`
    pub endpoint: String,
    /// Prefix for every rendered price
    pub currency_symbol: String,
    /// Optional whole-request timeout; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Log destination; defaults to the user cache directory
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            request_timeout_secs: None,
            log_file: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NoHomeDirectory => {
                "Could not locate a configuration directory; pass --config".to_string()
            }
            ConfigError::Io { path, source } => {
                format!("Cannot read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                format!("Invalid config file {}: {}", path.display(), source)
            }
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("org", "catalog-explorer", "catalog-explorer")
        .ok_or(ConfigError::NoHomeDirectory)
}

impl Config {
    /// Load from `path`, or from the per-user config directory when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load_from(&Self::default_path()?),
        }
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn default_log_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.cache_dir().join(LOG_FILE_NAME))
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        endpoint: Option<String>,
        currency_symbol: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(symbol) = currency_symbol {
            self.currency_symbol = symbol;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Configured log path, falling back to the cache directory.
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Self::default_log_path(),
        }
    }
}
