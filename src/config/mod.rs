//! Layered configuration.
//!
//! Settings come from built-in defaults, an optional TOML file, and finally
//! `DESKFLOW_*` environment variables. Invalid environment values are logged
//! and ignored so that a typo never prevents startup.

mod load;
mod schema;

pub use load::{
    ConfigError, DATABASE_URL_ENV, LOG_FILTER_ENV, NOTIFICATION_LIMIT_ENV, apply_env_overrides,
    from_toml_str, load_from_path, load_or_default,
};
pub use schema::{Config, LoggingSettings, NotificationSettings, PrincipalEntry, StorageSettings};

#[cfg(test)]
mod tests;
