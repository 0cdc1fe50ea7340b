use std::fmt;

use thiserror::Error;

use super::params::bind_named_params;
use super::query::{build_result_set, sqlite_extract_value_sync};
use crate::binding::ParameterSet;
use crate::provider::Connection;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Failure reported by a `SQLite` command.
///
/// SQLite's own message ("no such table: users") is kept as the innermost error, rather
/// than the generic result-code description rusqlite chains underneath it.
#[derive(Debug, Error)]
pub enum SqliteCommandError {
    #[error("{0}")]
    Failure(String),

    #[error(transparent)]
    Driver(rusqlite::Error),
}

impl From<rusqlite::Error> for SqliteCommandError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(message)) => {
                SqliteCommandError::Failure(message)
            }
            other => SqliteCommandError::Driver(other),
        }
    }
}

/// An open `SQLite` connection. Closed when dropped.
pub struct SqliteConnection {
    pub(crate) conn: rusqlite::Connection,
}

impl SqliteConnection {
    #[must_use]
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying rusqlite connection.
    #[must_use]
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }

    /// Run several parameterless statements, e.g. schema setup.
    ///
    /// # Errors
    ///
    /// Returns `SqliteCommandError` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqliteCommandError> {
        self.conn.execute_batch(sql).map_err(Into::into)
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Connection for SqliteConnection {
    type Error = SqliteCommandError;

    fn fill(&mut self, sql: &str, params: &ParameterSet) -> Result<ResultSet, Self::Error> {
        let mut stmt = self.conn.prepare(sql)?;
        bind_named_params(&mut stmt, params)?;
        Ok(build_result_set(&mut stmt)?)
    }

    fn execute_scalar(
        &mut self,
        sql: &str,
        params: &ParameterSet,
    ) -> Result<RowValues, Self::Error> {
        let mut stmt = self.conn.prepare(sql)?;
        bind_named_params(&mut stmt, params)?;
        if stmt.column_count() == 0 {
            stmt.raw_execute()?;
            return Ok(RowValues::Null);
        }
        let mut rows = stmt.raw_query();
        match rows.next()? {
            Some(row) => Ok(sqlite_extract_value_sync(row, 0)?),
            None => Ok(RowValues::Null),
        }
    }

    fn execute_non_query(
        &mut self,
        sql: &str,
        params: &ParameterSet,
    ) -> Result<usize, Self::Error> {
        let mut stmt = self.conn.prepare(sql)?;
        bind_named_params(&mut stmt, params)?;
        if stmt.column_count() > 0 {
            // Statements that yield rows (SELECT, RETURNING) are stepped to completion.
            let mut rows = stmt.raw_query();
            while rows.next()?.is_some() {}
            return Ok(0);
        }
        Ok(stmt.raw_execute()?)
    }
}
