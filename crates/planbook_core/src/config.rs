//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database location and logging settings from environment values.
//!
//! # Invariants
//! - Empty values behave as unset.
//! - A configured log level is always one `init_logging` accepts.
//! - A configured log directory is always absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PLANBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PLANBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PLANBOOK_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file path. `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Normalized log level.
    pub log_level: &'static str,
    /// Rolling log directory. `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(|err| ConfigError {
                key: ENV_LOG_LEVEL,
                message: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = read(ENV_LOG_DIR)
            .map(|value| {
                normalize_log_dir(PathBuf::from(value).as_path()).map_err(|err| ConfigError {
                    key: ENV_LOG_DIR,
                    message: err.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level,
            log_dir,
        })
    }
}
