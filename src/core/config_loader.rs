// src/core/config_loader.rs

//! # Config Loader
//!
//! Resolves the optional `config.toml` and merges it over the built-in defaults.
//! The lookup order is: an explicit `--config` path, then `$TSH_CONFIG`, then
//! `<system config dir>/tsh/config.toml`. Only the last one may be absent.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILENAME, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROMPT,
};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

const MIN_POLL_INTERVAL_MS: u64 = 1;
const MAX_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The on-disk shape of `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub prompt: Option<String>,
    pub emit_prompt: Option<bool>,
    pub verbose: Option<bool>,
    pub poll_interval_ms: Option<u64>,
}

/// Fully resolved runtime settings for one shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub emit_prompt: bool,
    pub verbose: bool,
    /// Upper bound on how long the foreground wait sleeps between checks.
    pub poll_interval: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            emit_prompt: true,
            verbose: false,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl ShellConfig {
    /// Layers a parsed file over the defaults.
    pub fn from_file_config(file: FileConfig) -> Self {
        let defaults = Self::default();
        let poll_ms = file
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        Self {
            prompt: file.prompt.unwrap_or(defaults.prompt),
            emit_prompt: file.emit_prompt.unwrap_or(defaults.emit_prompt),
            verbose: file.verbose.unwrap_or(defaults.verbose),
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}

/// Parses the TOML text of a config file.
pub fn parse_config(content: &str, origin: &Path) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.display().to_string(),
        source,
    })
}

/// Returns the default config location, `None` if the system has no config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Loads the session configuration.
///
/// # Errors
/// Fails if an explicitly requested file (flag or environment variable) cannot
/// be read, or if any file that exists is not valid TOML for `FileConfig`.
pub fn load_config(explicit: Option<&Path>) -> Result<ShellConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (Some(path.to_path_buf()), true),
        None => match env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => (Some(PathBuf::from(value)), true),
            _ => (default_config_path(), false),
        },
    };

    let Some(path) = path else {
        log::debug!("No config directory on this system; using defaults.");
        return Ok(ShellConfig::default());
    };

    if !required && !path.exists() {
        log::debug!("No config file at '{}'; using defaults.", path.display());
        return Ok(ShellConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    log::debug!("Loaded config from '{}'", path.display());
    Ok(ShellConfig::from_file_config(parse_config(&content, &path)?))
}
