//! Environment-driven configuration for API hosts.
//!
//! Blank values count as unset.

use std::path::PathBuf;
use storefront_core::{default_log_level, init_logging};

pub const DB_PATH_ENV: &str = "STOREFRONT_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "STOREFRONT_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STOREFRONT_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "storefront.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// SQLite database file; created and migrated on first open.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl ApiConfig {
    /// Reads `STOREFRONT_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Starts logging when a log directory is configured.
    ///
    /// # Errors
    /// Returns the logging bootstrap message on invalid level or directory.
    pub fn init_logging(&self) -> Result<(), String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> ApiConfig {
        let values = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        ApiConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = config_from(&[(DB_PATH_ENV, "  "), (LOG_LEVEL_ENV, "")]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("storefront.sqlite3")
        );
        assert_eq!(config.log_level, storefront_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let config = config_from(&[
            (DB_PATH_ENV, " /var/lib/storefront/db.sqlite3 "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/storefront"),
        ]);
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/storefront/db.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/storefront")));
    }

    #[test]
    fn init_logging_without_directory_is_a_no_op() {
        let config = config_from(&[(LOG_LEVEL_ENV, "not-a-level")]);
        assert!(config.init_logging().is_ok());
    }
}
