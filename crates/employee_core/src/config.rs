//! Runtime configuration for embedding the employee store.
//!
//! # Responsibility
//! - Resolve database location and logging settings from the environment.
//! - Open the configured database and start logging from one place.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults instead of failing.
//! - Invalid values (unknown level, relative log dir) are rejected.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level, normalize_log_dir};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "EMPLOYEE_STORE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "EMPLOYEE_STORE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "EMPLOYEE_STORE_LOG_DIR";

const IN_MEMORY_MARKER: &str = ":memory:";

/// Where the employee database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// Private in-memory database, discarded with the connection.
    InMemory,
    /// SQLite database file, created on first open.
    File(PathBuf),
}

/// Resolved store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_location: DbLocation,
    pub log_level: &'static str,
    /// File logging is skipped when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_location: DbLocation::InMemory,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads `EMPLOYEE_STORE_DB_PATH`, `EMPLOYEE_STORE_LOG_LEVEL` and
    /// `EMPLOYEE_STORE_LOG_DIR` from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_location = match read(DB_PATH_ENV) {
            None => DbLocation::InMemory,
            Some(value) if value == IN_MEMORY_MARKER => DbLocation::InMemory,
            Some(value) => DbLocation::File(PathBuf::from(value)),
        };

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => {
                normalize_level(&value).map_err(|err| format!("{LOG_LEVEL_ENV}: {err}"))?
            }
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_ENV)
            .map(|value| normalize_log_dir(&value))
            .transpose()
            .map_err(|err| format!("{LOG_DIR_ENV}: {err}"))?;

        Ok(Self {
            db_location,
            log_level,
            log_dir,
        })
    }

    /// Opens and migrates the configured database.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_location {
            DbLocation::InMemory => open_db_in_memory(),
            DbLocation::File(path) => open_db(path),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging is active after the call.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
        init_logging(self.log_level, log_dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{DbLocation, StoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn reads_file_location_level_and_log_dir() {
        let config = StoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /var/lib/employees.sqlite3 "),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "/var/log/employees"),
        ]))
        .unwrap();

        assert_eq!(
            config.db_location,
            DbLocation::File(PathBuf::from("/var/lib/employees.sqlite3"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/employees")));
    }

    #[test]
    fn memory_marker_and_blank_path_mean_in_memory() {
        for value in [":memory:", "   "] {
            let config = StoreConfig::from_lookup(lookup(&[(DB_PATH_ENV, value)])).unwrap();
            assert_eq!(config.db_location, DbLocation::InMemory);
        }
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let level_err = StoreConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(level_err.starts_with(LOG_LEVEL_ENV));

        let dir_err = StoreConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs")])).unwrap_err();
        assert!(dir_err.contains("absolute"));
    }

    #[test]
    fn init_logging_without_dir_is_skipped() {
        assert!(!StoreConfig::default().init_logging().unwrap());
    }

    #[test]
    fn open_db_uses_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.sqlite3");
        let config = StoreConfig {
            db_location: DbLocation::File(path.clone()),
            ..StoreConfig::default()
        };

        drop(config.open_db().unwrap());
        assert!(path.exists());
    }
}
