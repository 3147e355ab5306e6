//! Configuration loading and environment overrides.

use super::Config;
use crate::principal::ports::PrincipalDirectoryError;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides `storage.database_url`.
pub const DATABASE_URL_ENV: &str = "DESKFLOW_DATABASE_URL";
/// Overrides `logging.filter`.
pub const LOG_FILTER_ENV: &str = "DESKFLOW_LOG_FILTER";
/// Overrides `notifications.list_limit`.
pub const NOTIFICATION_LIMIT_ENV: &str = "DESKFLOW_NOTIFICATION_LIMIT";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted setting name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A roster entry is malformed.
    #[error("invalid principal '{id}' in roster: {reason}")]
    InvalidPrincipal {
        /// Identifier as written in the roster.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The directory could not be populated from the roster.
    #[error(transparent)]
    Directory(#[from] PrincipalDirectoryError),
}

/// Parses and validates configuration from TOML text, without environment
/// overrides.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML or any validation error
/// from [`Config::validate`].
pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Loads a configuration file and applies environment overrides.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the file cannot be read, or any error
/// from [`from_toml_str`].
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = from_toml_str(&contents)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Loads `path` when given, otherwise starts from defaults; environment
/// overrides apply either way.
///
/// # Errors
///
/// Returns any error from [`load_from_path`].
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(file) => load_from_path(file),
        None => {
            let mut config = Config::default();
            apply_env_overrides(&mut config);
            Ok(config)
        }
    }
}

/// Applies `DESKFLOW_*` environment overrides in place.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(raw) = std::env::var(DATABASE_URL_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.storage.database_url = Some(trimmed.to_owned());
        }
    }

    if let Ok(raw) = std::env::var(LOG_FILTER_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            trimmed.clone_into(&mut config.logging.filter);
        }
    }

    if let Ok(raw) = std::env::var(NOTIFICATION_LIMIT_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<usize>() {
                Ok(0) => {
                    tracing::warn!("{NOTIFICATION_LIMIT_ENV} must be positive, ignoring");
                }
                Ok(value) => {
                    config.notifications.list_limit = value;
                }
                Err(err) => {
                    tracing::warn!("invalid {NOTIFICATION_LIMIT_ENV}, ignoring: {err}");
                }
            }
        }
    }
}
