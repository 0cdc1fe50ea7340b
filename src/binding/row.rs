use super::inspector::{Bindable, PropertyInfo};
use super::values::to_ordinal;
use crate::error::SqlBinderError;
use crate::results::CustomDbRow;
use crate::types::{PropertyType, RowValues};

/// Copy matching columns of `row` onto `destination`.
///
/// Columns match properties by caption, ignoring case. NULL columns are skipped, so the
/// property keeps whatever value it had. When several columns share a caption they are
/// applied in column order and the last one wins. Unmatched columns and properties are
/// left alone.
///
/// # Errors
///
/// Returns `SqlBinderError::CoercionError` when a column value cannot be stored in the
/// matching property.
pub fn bind_row<T: Bindable + ?Sized>(
    row: &CustomDbRow,
    destination: &mut T,
) -> Result<(), SqlBinderError> {
    for prop in T::properties() {
        for (caption, value) in row.columns() {
            if value.is_null() || !prop.matches_caption(caption) {
                continue;
            }
            let coerced = coerce_column(prop, value)?;
            destination.set_property(prop.name, coerced)?;
        }
    }
    Ok(())
}

/// Apply the boolean and enumeration rules; other values pass through for the setter.
///
/// # Errors
///
/// Returns `SqlBinderError::CoercionError` when an enumeration property receives a
/// value with no integer ordinal.
pub fn coerce_column(prop: &PropertyInfo, value: &RowValues) -> Result<RowValues, SqlBinderError> {
    match prop.declared_type {
        PropertyType::Bool => Ok(RowValues::Bool(text_is_true(value))),
        PropertyType::Enum => to_ordinal(value)
            .map(RowValues::Enum)
            .map_err(|e| SqlBinderError::CoercionError(format!("{}: {e}", prop.name))),
        PropertyType::Object
        | PropertyType::Text
        | PropertyType::Int
        | PropertyType::Decimal
        | PropertyType::Float
        | PropertyType::DateTime => Ok(value.clone()),
    }
}

/// `"1"` or any casing of `"true"`.
fn text_is_true(value: &RowValues) -> bool {
    let text = value.to_string();
    text == "1" || text.to_lowercase() == "true"
}
