//! Typed retrieval on top of [`SqlBinder`]: lists of bound structs, scalars and maps.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;

use crate::binding::{Bindable, FromValue, ParameterSet, bind_parameters, bind_row};
use crate::error::SqlBinderError;
use crate::executor::SqlBinder;
use crate::provider::ConnectionProvider;
use crate::results::ResultSet;

impl<P: ConnectionProvider> SqlBinder<P> {
    /// One default-constructed `T` per result row, with matching columns bound onto it.
    ///
    /// ```rust,no_run
    /// use sql_binder::prelude::*;
    /// use sql_binder::impl_bindable;
    ///
    /// #[derive(Debug, Default)]
    /// struct User {
    ///     id: i64,
    ///     name: String,
    /// }
    /// impl_bindable!(User { id: i64, name: String });
    ///
    /// # fn demo() -> Result<(), SqlBinderError> {
    /// let binder = SqlBinder::new(SqliteProvider::builder("app.db".into()).build());
    /// let users: Vec<User> = binder.fetch_list("SELECT Id, Name FROM users")?;
    /// # let _ = users;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `QueryExecutionError` if the query fails and `CoercionError` if a column
    /// cannot be stored in its property.
    pub fn fetch_list<T: Bindable + Default>(&self, sql: &str) -> Result<Vec<T>, SqlBinderError> {
        materialize(&self.fetch_table(sql)?)
    }

    /// [`SqlBinder::fetch_list`] with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_list`].
    pub fn fetch_list_with<T, S>(&self, sql: &str, source: &S) -> Result<Vec<T>, SqlBinderError>
    where
        T: Bindable + Default,
        S: Bindable + ?Sized,
    {
        materialize(&self.fetch_table_with(sql, source)?)
    }

    /// The scalar result converted directly to `T`.
    ///
    /// An empty result is NULL, which only `Option<T>` accepts.
    ///
    /// # Errors
    ///
    /// Returns `QueryExecutionError` if the query fails and `CoercionError` if the value
    /// is not a `T`.
    pub fn fetch_scalar_as<T: FromValue>(&self, sql: &str) -> Result<T, SqlBinderError> {
        T::from_value(self.fetch_scalar(sql)?)
    }

    /// [`SqlBinder::fetch_scalar_as`] with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_scalar_as`].
    pub fn fetch_scalar_as_with<T, S>(&self, sql: &str, source: &S) -> Result<T, SqlBinderError>
    where
        T: FromValue,
        S: Bindable + ?Sized,
    {
        T::from_value(self.fetch_scalar_with(sql, source)?)
    }

    /// Map built from the first two columns: column 0 is the key, column 1 the value.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKeyError` on the first repeated key, `ColumnCountError` if the
    /// result has fewer than two columns, `CoercionError` if a key or value does not
    /// convert, and `QueryExecutionError` if the query fails.
    pub fn fetch_map<K, V>(&self, sql: &str) -> Result<HashMap<K, V>, SqlBinderError>
    where
        K: FromValue + Eq + Hash + Debug,
        V: FromValue,
    {
        build_map(&self.fetch_table(sql)?)
    }

    /// [`SqlBinder::fetch_map`] with parameters read from `source`.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_map`].
    pub fn fetch_map_with<K, V, S>(
        &self,
        sql: &str,
        source: &S,
    ) -> Result<HashMap<K, V>, SqlBinderError>
    where
        K: FromValue + Eq + Hash + Debug,
        V: FromValue,
        S: Bindable + ?Sized,
    {
        build_map(&self.fetch_table_with(sql, source)?)
    }

    /// Query using `source` for parameters, then bind every result row back onto it.
    ///
    /// With several rows the last one wins for each column; with none, `source` is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// See [`SqlBinder::fetch_list`].
    pub fn bind_self<T: Bindable>(&self, sql: &str, source: &mut T) -> Result<(), SqlBinderError> {
        let params: ParameterSet = bind_parameters(sql, &*source);
        let table = self.fetch_table_params(sql, &params)?;
        for row in &table {
            bind_row(row, source)?;
        }
        Ok(())
    }
}

fn materialize<T: Bindable + Default>(table: &ResultSet) -> Result<Vec<T>, SqlBinderError> {
    table
        .iter()
        .map(|row| -> Result<T, SqlBinderError> {
            let mut instance = T::default();
            bind_row(row, &mut instance)?;
            Ok(instance)
        })
        .collect()
}

fn build_map<K, V>(table: &ResultSet) -> Result<HashMap<K, V>, SqlBinderError>
where
    K: FromValue + Eq + Hash + Debug,
    V: FromValue,
{
    let mut map = HashMap::with_capacity(table.len());
    for (idx, row) in table.iter().enumerate() {
        let (Some(key), Some(value)) = (row.get_by_index(0), row.get_by_index(1)) else {
            return Err(SqlBinderError::ColumnCountError(format!(
                "row {idx} has {} column(s); a map needs key and value columns",
                row.len()
            )));
        };
        let key = K::from_value(key.clone())?;
        let value = V::from_value(value.clone())?;
        match map.entry(key) {
            Entry::Occupied(entry) => {
                return Err(SqlBinderError::DuplicateKeyError(format!(
                    "{:?} (row {idx})",
                    entry.key()
                )));
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::create_test_row;
    use crate::types::RowValues;

    fn table(cols: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
        let names: Vec<String> = cols.iter().map(ToString::to_string).collect();
        let mut set = ResultSet::default();
        for values in rows {
            set.add_row(create_test_row(names.clone(), values));
        }
        set
    }

    #[test]
    fn map_from_first_two_columns() {
        let set = table(
            &["code", "label", "extra"],
            vec![
                vec![RowValues::Int(1), RowValues::Text("one".into()), RowValues::Null],
                vec![RowValues::Int(2), RowValues::Text("two".into()), RowValues::Null],
            ],
        );
        let map: HashMap<i64, String> = build_map(&set).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&2], "two");
    }

    #[test]
    fn duplicate_key_fails() {
        let set = table(
            &["code", "label"],
            vec![
                vec![RowValues::Int(1), RowValues::Text("a".into())],
                vec![RowValues::Int(1), RowValues::Text("b".into())],
            ],
        );
        let err = build_map::<i64, String>(&set).unwrap_err();
        assert!(matches!(err, SqlBinderError::DuplicateKeyError(_)));
    }

    #[test]
    fn single_column_cannot_build_map() {
        let set = table(&["code"], vec![vec![RowValues::Int(1)]]);
        assert!(matches!(
            build_map::<i64, i64>(&set),
            Err(SqlBinderError::ColumnCountError(_))
        ));
    }

    #[test]
    fn empty_result_is_empty_map() {
        let map: HashMap<String, i64> = build_map(&ResultSet::default()).unwrap();
        assert!(map.is_empty());
    }
}
