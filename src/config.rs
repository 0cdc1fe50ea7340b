//! Connection-string configuration files.
//!
//! ```json
//! {
//!   "connection_strings": [
//!     { "name": "default", "connection_string": "Data Source=app.db;Busy Timeout=5000" }
//!   ]
//! }
//! ```
//!
//! When several entries are present the last one is active.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SqlBinderError;

/// File name looked up by [`BinderConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "sql-binder.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStringEntry {
    #[serde(default)]
    pub name: String,
    pub connection_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderConfig {
    #[serde(default)]
    pub connection_strings: Vec<ConnectionStringEntry>,
}

impl BinderConfig {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SqlBinderError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SqlBinderError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
            .map_err(|e| SqlBinderError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Parse config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the JSON does not describe a config.
    pub fn from_json(raw: &str) -> Result<Self, SqlBinderError> {
        serde_json::from_str(raw).map_err(|e| SqlBinderError::ConfigError(e.to_string()))
    }

    /// Load `sql-binder.json` from `dir` if it exists.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the file exists but cannot be loaded.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, SqlBinderError> {
        let path: PathBuf = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no binder config file");
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// The connection string in effect: the last one listed.
    #[must_use]
    pub fn active_connection_string(&self) -> Option<&str> {
        self.connection_strings
            .last()
            .map(|entry| entry.connection_string.as_str())
    }

    /// Look up a connection string by name, ignoring case.
    #[must_use]
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings
            .iter()
            .rev()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.connection_string.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_entry_is_active() {
        let config = BinderConfig::from_json(
            r#"{"connection_strings": [
                {"name": "old", "connection_string": "old.db"},
                {"name": "current", "connection_string": "Data Source=current.db"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            config.active_connection_string(),
            Some("Data Source=current.db")
        );
        assert_eq!(config.connection_string("OLD"), Some("old.db"));
    }

    #[test]
    fn empty_config_has_no_connection() {
        let config = BinderConfig::from_json("{}").unwrap();
        assert_eq!(config.active_connection_string(), None);
    }

    #[test]
    fn discover_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BinderConfig::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn discover_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"connection_strings": [{"connection_string": "a.db"}]}"#,
        )
        .unwrap();
        let config = BinderConfig::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.active_connection_string(), Some("a.db"));
    }

    #[test]
    fn malformed_file_is_config_error() {
        assert!(matches!(
            BinderConfig::from_json("[1, 2"),
            Err(SqlBinderError::ConfigError(_))
        ));
    }
}
