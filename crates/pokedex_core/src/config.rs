//! Environment-driven configuration.
//!
//! | Variable            | Meaning                          | Default                       |
//! |---------------------|----------------------------------|-------------------------------|
//! | `POKEDEX_DB_PATH`   | store file                       | `<temp_dir>/pokedex.sqlite3`  |
//! | `POKEDEX_LOG_LEVEL` | `trace\|debug\|info\|warn\|error` | build-mode default            |
//! | `POKEDEX_LOG_DIR`   | absolute log directory           | unset: file logging disabled  |
//!
//! Blank values are treated as unset.

use crate::logging::{default_log_level, LogConfig, LogLevel, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "POKEDEX_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "POKEDEX_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "POKEDEX_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "pokedex.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { var: &'static str, source: LoggingError },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, source } => write!(f, "invalid `{var}`: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
        }
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokedexConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl PokedexConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(raw) => LogLevel::parse(&raw).map_err(|source| ConfigError::InvalidValue {
                var: LOG_LEVEL_VAR,
                source,
            })?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        })
    }

    /// File logging settings, when a log directory is configured.
    pub fn log_config(&self) -> Option<LogConfig> {
        self.log_dir.as_ref().map(|log_dir| LogConfig {
            level: self.log_level,
            log_dir: log_dir.clone(),
        })
    }
}
