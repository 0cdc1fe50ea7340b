//! Seams to the database client: where connections come from and how commands run.

use crate::binding::ParameterSet;
use crate::error::SqlBinderError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Hands out a fresh, ready-to-use connection per call.
///
/// The executor owns the returned connection for exactly one operation and drops it
/// before returning, so any release logic belongs in the connection's `Drop`.
pub trait ConnectionProvider {
    type Connection: Connection;

    /// # Errors
    ///
    /// Returns `SqlBinderError::ConnectionError` (or `ConfigError`) when no connection can
    /// be opened.
    fn get_connection(&self) -> Result<Self::Connection, SqlBinderError>;
}

/// Command primitives of a single open connection.
///
/// Every parameter name in `params` corresponds to an `@name` placeholder in `sql`.
pub trait Connection {
    type Error: std::error::Error + 'static;

    /// Run a query and materialise every row and column.
    ///
    /// # Errors
    ///
    /// Returns the backend error if preparation, binding or execution fails.
    fn fill(&mut self, sql: &str, params: &ParameterSet) -> Result<ResultSet, Self::Error>;

    /// First column of the first row, or `RowValues::Null` when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns the backend error if preparation, binding or execution fails.
    fn execute_scalar(&mut self, sql: &str, params: &ParameterSet)
    -> Result<RowValues, Self::Error>;

    /// Run a statement and report the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the backend error if preparation, binding or execution fails.
    fn execute_non_query(&mut self, sql: &str, params: &ParameterSet)
    -> Result<usize, Self::Error>;
}
