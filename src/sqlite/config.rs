use std::path::Path;
use std::time::Duration;

use super::connection::SqliteConnection;
use crate::config::BinderConfig;
use crate::error::SqlBinderError;
use crate::provider::ConnectionProvider;

/// Options for opening `SQLite` connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
    pub busy_timeout: Option<Duration>,
    pub foreign_keys: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            busy_timeout: None,
            foreign_keys: false,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = Some(busy_timeout);
        self
    }

    #[must_use]
    pub fn with_foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    /// Parse a connection string.
    ///
    /// Accepts a bare database path, or `key=value` pairs separated by `;` with the keys
    /// `Data Source` (or `Filename`), `Busy Timeout` (milliseconds) and `Foreign Keys`.
    /// Keys ignore case, spaces and underscores.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` for an empty string, a missing data source or
    /// an unparsable value.
    pub fn from_connection_string(raw: &str) -> Result<Self, SqlBinderError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SqlBinderError::ConfigError(
                "empty SQLite connection string".into(),
            ));
        }
        if !raw.contains('=') {
            return Ok(Self::new(raw.to_string()));
        }

        let mut db_path = None;
        let mut busy_timeout = None;
        let mut foreign_keys = false;
        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                SqlBinderError::ConfigError(format!("expected key=value, found '{part}'"))
            })?;
            let value = value.trim();
            match normalize_key(key).as_str() {
                "datasource" | "filename" => db_path = Some(value.to_string()),
                "busytimeout" => {
                    let millis = value.parse::<u64>().map_err(|e| {
                        SqlBinderError::ConfigError(format!("invalid busy timeout '{value}': {e}"))
                    })?;
                    busy_timeout = Some(Duration::from_millis(millis));
                }
                "foreignkeys" => foreign_keys = parse_flag(value)?,
                _ => tracing::warn!(key = key.trim(), "ignoring unknown connection string key"),
            }
        }

        let db_path = db_path.ok_or_else(|| {
            SqlBinderError::ConfigError("connection string has no Data Source".into())
        })?;
        Ok(Self {
            db_path,
            busy_timeout,
            foreign_keys,
        })
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_flag(value: &str) -> Result<bool, SqlBinderError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(SqlBinderError::ConfigError(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.opts.busy_timeout = Some(busy_timeout);
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> SqliteProvider {
        SqliteProvider::new(self.finish())
    }
}

/// Opens a new `SQLite` connection for every request.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    options: SqliteOptions,
}

impl SqliteProvider {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Provider for the active (last) connection string of `config`.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the config lists no connection string or
    /// the active one cannot be parsed.
    pub fn from_config(config: &BinderConfig) -> Result<Self, SqlBinderError> {
        let raw = config.active_connection_string().ok_or_else(|| {
            SqlBinderError::ConfigError("no connection strings configured".into())
        })?;
        SqliteOptions::from_connection_string(raw).map(Self::new)
    }

    /// Provider configured from `sql-binder.json` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the file is missing or invalid.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SqlBinderError> {
        let dir = dir.as_ref();
        let config = BinderConfig::discover(dir)?.ok_or_else(|| {
            SqlBinderError::ConfigError(format!(
                "no {} in {}",
                crate::config::CONFIG_FILE_NAME,
                dir.display()
            ))
        })?;
        Self::from_config(&config)
    }

    /// Provider configured from `sql-binder.json` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConfigError` if the working directory cannot be resolved
    /// or holds no valid config file.
    pub fn from_current_dir() -> Result<Self, SqlBinderError> {
        let dir = std::env::current_dir()
            .map_err(|e| SqlBinderError::ConfigError(format!("no working directory: {e}")))?;
        Self::from_dir(dir)
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }
}

impl ConnectionProvider for SqliteProvider {
    type Connection = SqliteConnection;

    fn get_connection(&self) -> Result<SqliteConnection, SqlBinderError> {
        let opts = &self.options;
        let conn = rusqlite::Connection::open(&opts.db_path).map_err(|e| {
            SqlBinderError::ConnectionError(format!("cannot open {}: {e}", opts.db_path))
        })?;
        if let Some(timeout) = opts.busy_timeout {
            conn.busy_timeout(timeout).map_err(|e| {
                SqlBinderError::ConnectionError(format!("cannot set busy timeout: {e}"))
            })?;
        }
        if opts.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")
                .map_err(|e| {
                    SqlBinderError::ConnectionError(format!("cannot enable foreign keys: {e}"))
                })?;
        }
        tracing::debug!(db_path = %opts.db_path, "opened SQLite connection");
        Ok(SqliteConnection::new(conn))
    }
}
