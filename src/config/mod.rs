//! Configuration management for `remark_import`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. Environment variables (`REMARK_IMPORT_DB`, `REMARK_IMPORT_BUSY_TIMEOUT`)
//! 2. YAML config file
//! 3. Defaults

use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default database filename used when nothing else is configured.
const DEFAULT_DB_FILENAME: &str = "remark.db";
/// Default time to wait for a locked database, in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub const ENV_DB: &str = "REMARK_IMPORT_DB";
pub const ENV_BUSY_TIMEOUT: &str = "REMARK_IMPORT_BUSY_TIMEOUT";

/// Where and how to open the comment database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub database: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DB_FILENAME),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Load from a YAML file. Missing files return defaults.
    ///
    /// A relative `database` path is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(&contents)?;

        if config.database.as_os_str().is_empty() {
            config.database = PathBuf::from(DEFAULT_DB_FILENAME);
        }
        if config.database.is_relative() {
            if let Some(parent) = path.parent() {
                config.database = parent.join(&config.database);
            }
        }

        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the busy timeout variable is not a number.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(env::var(ENV_DB).ok(), env::var(ENV_BUSY_TIMEOUT).ok())
    }

    fn apply_overrides(&mut self, db: Option<String>, busy_timeout: Option<String>) -> Result<()> {
        if let Some(value) = db {
            if !value.trim().is_empty() {
                self.database = PathBuf::from(value);
            }
        }

        if let Some(value) = busy_timeout {
            let value = value.trim();
            if !value.is_empty() {
                self.busy_timeout_ms = value.parse().map_err(|_| {
                    Error::Config(format!("{ENV_BUSY_TIMEOUT} must be milliseconds, got '{value}'"))
                })?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Load configuration with the documented precedence.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or an
/// environment override is malformed.
pub fn load_config(path: Option<&Path>) -> Result<StoreConfig> {
    let mut config = match path {
        Some(path) => StoreConfig::from_yaml(path)?,
        None => StoreConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

/// Open storage using a resolved config.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_storage(config: &StoreConfig) -> Result<SqliteStorage> {
    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    SqliteStorage::open_with_timeout(&config.database, config.busy_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.database, PathBuf::from("remark.db"));
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::from_yaml(&temp.path().join("nope.yaml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_yaml_relative_database_resolved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("import.yaml");
        fs::write(&path, "database: data/comments.db\nbusy_timeout_ms: 250\n").unwrap();

        let config = StoreConfig::from_yaml(&path).unwrap();
        assert_eq!(config.database, temp.path().join("data/comments.db"));
        assert_eq!(config.busy_timeout_ms, 250);
    }

    #[test]
    fn test_yaml_partial_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("import.yaml");
        fs::write(&path, "busy_timeout_ms: 10\n").unwrap();

        let config = StoreConfig::from_yaml(&path).unwrap();
        assert_eq!(config.database, temp.path().join("remark.db"));
        assert_eq!(config.busy_timeout_ms, 10);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("import.yaml");
        fs::write(&path, "busy_timeout_ms: [not, a, number]\n").unwrap();
        assert!(matches!(
            StoreConfig::from_yaml(&path),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = StoreConfig::default();
        config
            .apply_overrides(Some("/tmp/other.db".to_string()), Some(" 42 ".to_string()))
            .unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.busy_timeout_ms, 42);
    }

    #[test]
    fn test_blank_overrides_ignored() {
        let mut config = StoreConfig::default();
        config
            .apply_overrides(Some("  ".to_string()), Some(String::new()))
            .unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = StoreConfig::default();
        let err = config
            .apply_overrides(None, Some("soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("soon")));
    }

    #[test]
    fn test_open_storage_creates_parent() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig {
            database: temp.path().join("nested").join("remark.db"),
            busy_timeout_ms: 100,
        };
        let storage = open_storage(&config).unwrap();
        assert_eq!(storage.count_site("blog").unwrap(), 0);
        assert!(config.database.exists());
    }
}
