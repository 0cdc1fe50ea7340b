//! Runs statements against connections from a [`ConnectionProvider`].
//!
//! Every operation acquires its own connection, binds parameters inferred from the
//! statement text, runs, and drops the connection before returning, whether it
//! succeeded or not.

use crate::binding::{Bindable, ParameterSet, bind_parameters};
use crate::error::SqlBinderError;
use crate::provider::{Connection, ConnectionProvider};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Entry point for executing SQL with convention-based parameter and row binding.
///
/// Each operation comes in two forms: without a source (nothing is bound) and
/// `_with` a source whose properties, or scalar value, supply the `@name` parameters.
#[derive(Debug, Clone)]
pub struct SqlBinder<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqlBinder<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run a query and materialise its rows.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if no connection can be opened and
    /// `QueryExecutionError` if the query fails.
    pub fn fetch_table(&self, sql: &str) -> Result<ResultSet, SqlBinderError> {
        self.fetch_table_params(sql, &ParameterSet::new())
    }

    /// Run a query with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn fetch_table_with<S: Bindable + ?Sized>(
        &self,
        sql: &str,
        source: &S,
    ) -> Result<ResultSet, SqlBinderError> {
        self.fetch_table_params(sql, &bind_parameters(sql, source))
    }

    /// First column of the first row, or `RowValues::Null` when there are no rows.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn fetch_scalar(&self, sql: &str) -> Result<RowValues, SqlBinderError> {
        self.fetch_scalar_params(sql, &ParameterSet::new())
    }

    /// [`SqlBinder::fetch_scalar`] with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn fetch_scalar_with<S: Bindable + ?Sized>(
        &self,
        sql: &str,
        source: &S,
    ) -> Result<RowValues, SqlBinderError> {
        self.fetch_scalar_params(sql, &bind_parameters(sql, source))
    }

    /// Run a statement that returns no results.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn execute(&self, sql: &str) -> Result<(), SqlBinderError> {
        self.execute_params(sql, &ParameterSet::new()).map(|_| ())
    }

    /// [`SqlBinder::execute`] with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn execute_with<S: Bindable + ?Sized>(
        &self,
        sql: &str,
        source: &S,
    ) -> Result<(), SqlBinderError> {
        self.execute_params(sql, &bind_parameters(sql, source))
            .map(|_| ())
    }

    /// Like [`SqlBinder::execute`], returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn execute_counted(&self, sql: &str) -> Result<usize, SqlBinderError> {
        self.execute_params(sql, &ParameterSet::new())
    }

    /// Like [`SqlBinder::execute_with`], returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn execute_counted_with<S: Bindable + ?Sized>(
        &self,
        sql: &str,
        source: &S,
    ) -> Result<usize, SqlBinderError> {
        self.execute_params(sql, &bind_parameters(sql, source))
    }

    /// Run `sql` with an explicit parameter set.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn fetch_table_params(
        &self,
        sql: &str,
        params: &ParameterSet,
    ) -> Result<ResultSet, SqlBinderError> {
        self.with_connection(sql, params, |conn| conn.fill(sql, params))
    }

    /// Scalar query with an explicit parameter set.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn fetch_scalar_params(
        &self,
        sql: &str,
        params: &ParameterSet,
    ) -> Result<RowValues, SqlBinderError> {
        self.with_connection(sql, params, |conn| conn.execute_scalar(sql, params))
    }

    /// Statement with an explicit parameter set; returns the affected row count.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_table`].
    pub fn execute_params(&self, sql: &str, params: &ParameterSet) -> Result<usize, SqlBinderError> {
        self.with_connection(sql, params, |conn| conn.execute_non_query(sql, params))
    }

    fn with_connection<R, F>(
        &self,
        sql: &str,
        params: &ParameterSet,
        op: F,
    ) -> Result<R, SqlBinderError>
    where
        F: FnOnce(
            &mut P::Connection,
        ) -> Result<R, <P::Connection as Connection>::Error>,
    {
        let mut conn = self.provider.get_connection()?;
        tracing::debug!(sql, params = params.len(), "executing statement");
        let result = op(&mut conn).map_err(|e| {
            let err = SqlBinderError::execution(&e);
            tracing::debug!(sql, error = %err, "statement failed");
            err
        });
        drop(conn);
        result
    }
}
