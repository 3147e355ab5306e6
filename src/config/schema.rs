//! Configuration schema.

use super::ConfigError;
use crate::notification::services::DEFAULT_LIST_LIMIT;
use crate::principal::{
    adapters::memory::InMemoryPrincipalDirectory,
    domain::{AccessToken, Principal, PrincipalId, Role},
};
use serde::{Deserialize, Serialize};

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notification engine settings.
    pub notifications: NotificationSettings,
    /// Persistence settings.
    pub storage: StorageSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Principals known to the in-memory directory.
    pub principals: Vec<PrincipalEntry>,
}

/// Notification engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Number of notifications returned when a caller does not choose.
    pub list_limit: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `PostgreSQL` connection string. Unset means in-memory storage.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: 4,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directive, e.g. `deskflow=debug`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

/// One principal in the configured roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalEntry {
    /// Principal identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role name: `manager`, `employee`, or `doc_assistant`.
    pub role: String,
    /// Department; blank means unassigned.
    #[serde(default)]
    pub department: String,
    /// Optional bearer token bound to the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl PrincipalEntry {
    /// Converts the entry into a validated principal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrincipal`] when any field is invalid.
    pub fn to_principal(&self) -> Result<Principal, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPrincipal {
            id: self.id.clone(),
            reason,
        };
        let id = PrincipalId::new(self.id.as_str()).map_err(|err| invalid(err.to_string()))?;
        let role = Role::try_from(self.role.as_str()).map_err(|err| invalid(err.to_string()))?;
        Principal::new(id, self.name.as_str(), role, self.department.as_str())
            .map_err(|err| invalid(err.to_string()))
    }
}

impl Config {
    /// Validates cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero pool size and
    /// [`ConfigError::InvalidPrincipal`] for a malformed roster entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.pool_size",
                reason: "must be at least 1".to_owned(),
            });
        }
        self.roster().map(|_| ())
    }

    /// Returns the configured roster as validated principals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrincipal`] for the first malformed
    /// entry.
    pub fn roster(&self) -> Result<Vec<Principal>, ConfigError> {
        self.principals
            .iter()
            .map(PrincipalEntry::to_principal)
            .collect()
    }

    /// Builds an in-memory directory holding the roster and its tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrincipal`] for a malformed entry or
    /// token, or [`ConfigError::Directory`] when the directory rejects it.
    pub fn directory(&self) -> Result<InMemoryPrincipalDirectory, ConfigError> {
        let directory = InMemoryPrincipalDirectory::with_principals(self.roster()?)?;
        for entry in &self.principals {
            let Some(raw_token) = entry.token.as_deref() else {
                continue;
            };
            let token = AccessToken::new(raw_token).map_err(|err| {
                ConfigError::InvalidPrincipal {
                    id: entry.id.clone(),
                    reason: err.to_string(),
                }
            })?;
            let id = PrincipalId::new(entry.id.as_str()).map_err(|err| {
                ConfigError::InvalidPrincipal {
                    id: entry.id.clone(),
                    reason: err.to_string(),
                }
            })?;
            directory.issue_token(&id, token)?;
        }
        Ok(directory)
    }
}
