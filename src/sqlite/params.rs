use rusqlite::Statement;
use rusqlite::types::Value;

use crate::binding::ParameterSet;
use crate::types::RowValues;

/// Convert a single `RowValue` to a rusqlite `Value`.
///
/// SQLite has no boolean, decimal or timestamp storage class: booleans and enum ordinals
/// become integers, decimals and timestamps become text.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Decimal(d) => Value::Text(d.to_string()),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Enum(ordinal) => Value::Integer(i64::from(*ordinal)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Named `SQLite` parameters, converted once and bound by name.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<(String, Value)>);

impl Params {
    #[must_use]
    pub fn convert(params: &ParameterSet) -> Self {
        Params(
            params
                .iter()
                .map(|(name, value)| (name.to_string(), row_value_to_sqlite_value(value)))
                .collect(),
        )
    }
}

/// Bind every parameter in `params` to the `@name` slots of `stmt`.
///
/// Slot names are compared ignoring case. A parameter with no slot (for instance one only
/// mentioned inside a string literal) is skipped.
///
/// # Errors
///
/// Returns `rusqlite::Error` if SQLite rejects a bind.
pub fn bind_named_params(
    stmt: &mut Statement<'_>,
    params: &ParameterSet,
) -> Result<(), rusqlite::Error> {
    for (name, value) in Params::convert(params).0 {
        let slots = matching_slots(stmt, &name);
        if slots.is_empty() {
            tracing::warn!(parameter = %name, "statement has no matching @ parameter; not bound");
            continue;
        }
        for slot in slots {
            stmt.raw_bind_parameter(slot, &value)?;
        }
    }
    Ok(())
}

fn matching_slots(stmt: &Statement<'_>, name: &str) -> Vec<usize> {
    let wanted = name.to_lowercase();
    (1..=stmt.parameter_count())
        .filter(|&idx| {
            stmt.parameter_name(idx)
                .and_then(|slot| slot.strip_prefix('@'))
                .is_some_and(|slot| slot.to_lowercase() == wanted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn converts_types_without_native_storage() {
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Bool(true)),
            Value::Integer(1)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Enum(3)),
            Value::Integer(3)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Decimal(Decimal::new(1050, 2))),
            Value::Text("10.50".into())
        );
        let dt = NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|d| d.and_hms_opt(7, 8, 9))
            .unwrap();
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Timestamp(dt)),
            Value::Text("2024-05-06 07:08:09".into())
        );
    }

    #[test]
    fn binds_by_name_ignoring_case() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("select @Name, @count").unwrap();
        let mut params = ParameterSet::new();
        params.push("count", RowValues::Int(2));
        params.push("name", RowValues::Text("ann".into()));
        params.push("unused", RowValues::Int(9));
        bind_named_params(&mut stmt, &params).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, String>(0).unwrap(), "ann");
        assert_eq!(row.get::<_, i64>(1).unwrap(), 2);
    }
}
