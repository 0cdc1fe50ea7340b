use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// Values that can be bound as statement parameters or read back from a result row.
///
/// `Null` is the null marker: it stands for "no value" in both directions and is never
/// coerced into a domain value.
/// ```rust
/// use sql_binder::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
///     RowValues::Null,
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Exact decimal value
    Decimal(Decimal),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Enumeration ordinal
    Enum(i32),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value, used for generic object properties
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            return parse_timestamp(s);
        }
        None
    }

    /// Name of the variant, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "integer",
            RowValues::Float(_) => "float",
            RowValues::Decimal(_) => "decimal",
            RowValues::Text(_) => "text",
            RowValues::Bool(_) => "boolean",
            RowValues::Enum(_) => "enumeration",
            RowValues::Timestamp(_) => "date-time",
            RowValues::Null => "null",
            RowValues::JSON(_) => "object",
            RowValues::Blob(_) => "blob",
        }
    }
}

/// Text form of a value. Boolean coercion during row binding compares against this.
impl fmt::Display for RowValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValues::Int(i) => write!(f, "{i}"),
            RowValues::Float(v) => write!(f, "{v}"),
            RowValues::Decimal(d) => write!(f, "{d}"),
            RowValues::Text(s) => f.write_str(s),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Enum(ordinal) => write!(f, "{ordinal}"),
            RowValues::Timestamp(dt) => write!(f, "{}", dt.format("%F %T%.f")),
            RowValues::Null => Ok(()),
            RowValues::JSON(json) => write!(f, "{json}"),
            RowValues::Blob(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Declared value type of a bindable property.
///
/// Only these types are visible to the binder; anything else on a struct is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Bool,
    /// Generic object (JSON or an untyped `RowValues`)
    Object,
    Text,
    Int,
    Decimal,
    Float,
    Enum,
    DateTime,
}

/// Returns true when `dt` is the date-time "zero" or minimum value.
///
/// Properties holding either are bound as NULL instead of the sentinel itself.
#[must_use]
pub fn is_datetime_sentinel(dt: &NaiveDateTime) -> bool {
    *dt == NaiveDateTime::MIN || Some(*dt) == zero_datetime()
}

/// `0001-01-01 00:00:00`
#[must_use]
pub fn zero_datetime() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let s = s.trim();
    if let Some(dt) = FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_of_scalars() {
        assert_eq!(RowValues::Int(1).to_string(), "1");
        assert_eq!(RowValues::Bool(true).to_string(), "true");
        assert_eq!(RowValues::Text("True".into()).to_string(), "True");
        assert_eq!(RowValues::Null.to_string(), "");
        assert_eq!(RowValues::Blob(vec![0x0a, 0xff]).to_string(), "0aff");
    }

    #[test]
    fn sentinel_covers_min_and_zero_date() {
        assert!(is_datetime_sentinel(&NaiveDateTime::MIN));
        assert!(is_datetime_sentinel(&zero_datetime().unwrap()));
        let real = parse_timestamp("2024-03-01 12:30:00").unwrap();
        assert!(!is_datetime_sentinel(&real));
    }

    #[test]
    fn parses_common_timestamp_layouts() {
        assert!(parse_timestamp("2024-03-01 12:30:00.125").is_some());
        assert!(parse_timestamp("2024-03-01T12:30:00").is_some());
        assert_eq!(
            parse_timestamp("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
