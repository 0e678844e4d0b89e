//! User configuration.
//!
//! Read from `config.toml` in the data directory. Command-line flags override
//! environment variables, which override the file.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::data_dir;

pub const ENV_API_URL: &str = "HIRECAL_API_URL";
pub const ENV_TOKEN: &str = "HIRECAL_TOKEN";

const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot determine config location: {0}")]
    Location(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No API URL configured. Pass --api-url, set HIRECAL_API_URL, or add api_url to config.toml")]
    MissingApiUrl,

    #[error("Provided --token value is empty")]
    EmptyToken,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    /// Port for the loopback listener used by `calendar connect`. 0 picks a free port.
    pub callback_port: Option<u16>,
    pub handshake_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load from the default location, returning defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = data_dir().map_err(|e| ConfigError::Location(e.to_string()))?;
    Ok(dir.join("config.toml"))
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct FlagOverrides<'a> {
    pub api_url: Option<&'a str>,
    pub token: Option<&'a str>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub callback_port: u16,
    pub handshake_timeout_secs: u64,
}

impl Settings {
    pub fn resolve(flags: &FlagOverrides<'_>, config: &AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(flags, config, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn resolve_with(
        flags: &FlagOverrides<'_>,
        config: &AppConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = flags
            .api_url
            .map(str::to_string)
            .or_else(|| env(ENV_API_URL))
            .or_else(|| config.api_url.clone())
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;

        let token = match flags.token {
            Some("") => return Err(ConfigError::EmptyToken),
            Some(token) => {
                debug!("Using provided --token override ({} chars)", token.len());
                Some(token.to_string())
            }
            None => env(ENV_TOKEN)
                .or_else(|| config.token.clone())
                .filter(|t| !t.is_empty()),
        };

        Ok(Settings {
            api_url,
            token,
            callback_port: config.callback_port.unwrap_or(0),
            handshake_timeout_secs: config
                .handshake_timeout_secs
                .unwrap_or(DEFAULT_HANDSHAKE_TIMEOUT_SECS),
        })
    }
}
