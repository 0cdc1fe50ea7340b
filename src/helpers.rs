//! Helper utilities for testing and development.

use std::sync::Arc;

use crate::results::CustomDbRow;
use crate::types::RowValues;

/// Create a row without a database, for exercising the row binder directly.
#[must_use]
pub fn create_test_row(column_names: Vec<String>, values: Vec<RowValues>) -> CustomDbRow {
    CustomDbRow::new(Arc::new(column_names), values)
}
