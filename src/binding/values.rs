//! Conversions between Rust field types and [`RowValues`].
//!
//! `ToValue` is the property getter side, `FromValue` the setter side. Setters own
//! representation conversion (an `Int` column into an `f64` field, ISO text into a
//! `NaiveDateTime`) and reject anything they cannot represent.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde_json::Value as JsonValue;

use crate::error::SqlBinderError;
use crate::types::{PropertyType, RowValues};

/// Read a field as a raw value.
pub trait ToValue {
    fn to_value(&self) -> RowValues;
}

/// Build a field from a raw value.
pub trait FromValue: Sized {
    /// # Errors
    ///
    /// Returns `SqlBinderError::CoercionError` if the value cannot be represented.
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError>;
}

/// A field type the binder can see, with its declared property type.
pub trait BindableField: ToValue + FromValue {
    const DECLARED_TYPE: PropertyType;
}

pub(crate) fn mismatch(target: &str, value: &RowValues) -> SqlBinderError {
    SqlBinderError::CoercionError(format!(
        "cannot convert {} value '{value}' to {target}",
        value.kind()
    ))
}

impl ToValue for bool {
    fn to_value(&self) -> RowValues {
        RowValues::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        value.as_bool().copied().ok_or_else(|| mismatch("bool", &value))
    }
}

impl BindableField for bool {
    const DECLARED_TYPE: PropertyType = PropertyType::Bool;
}

impl ToValue for String {
    fn to_value(&self) -> RowValues {
        RowValues::Text(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Text(s) => Ok(s),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl BindableField for String {
    const DECLARED_TYPE: PropertyType = PropertyType::Text;
}

impl ToValue for i64 {
    fn to_value(&self) -> RowValues {
        RowValues::Int(*self)
    }
}

impl FromValue for i64 {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Int(i) => Ok(i),
            RowValues::Enum(ordinal) => Ok(i64::from(ordinal)),
            other => Err(mismatch("i64", &other)),
        }
    }
}

impl BindableField for i64 {
    const DECLARED_TYPE: PropertyType = PropertyType::Int;
}

impl ToValue for i32 {
    fn to_value(&self) -> RowValues {
        RowValues::Int(i64::from(*self))
    }
}

impl FromValue for i32 {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Int(i) => i32::try_from(i).map_err(|_| mismatch("i32", &value)),
            RowValues::Enum(ordinal) => Ok(ordinal),
            other => Err(mismatch("i32", &other)),
        }
    }
}

impl BindableField for i32 {
    const DECLARED_TYPE: PropertyType = PropertyType::Int;
}

impl ToValue for f64 {
    fn to_value(&self) -> RowValues {
        RowValues::Float(*self)
    }
}

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Float(f) => Ok(f),
            RowValues::Int(i) => Ok(i as f64),
            RowValues::Decimal(d) => d.to_f64().ok_or_else(|| mismatch("f64", &value)),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl BindableField for f64 {
    const DECLARED_TYPE: PropertyType = PropertyType::Float;
}

impl ToValue for Decimal {
    fn to_value(&self) -> RowValues {
        RowValues::Decimal(*self)
    }
}

impl FromValue for Decimal {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        let converted = match &value {
            RowValues::Decimal(d) => Some(*d),
            RowValues::Int(i) => Some(Decimal::from(*i)),
            RowValues::Float(f) => Decimal::from_f64(*f),
            // SQLite has no decimal storage class; exact values round-trip as text
            RowValues::Text(s) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        };
        converted.ok_or_else(|| mismatch("Decimal", &value))
    }
}

impl BindableField for Decimal {
    const DECLARED_TYPE: PropertyType = PropertyType::Decimal;
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> RowValues {
        RowValues::Timestamp(*self)
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch("NaiveDateTime", &value))
    }
}

impl BindableField for NaiveDateTime {
    const DECLARED_TYPE: PropertyType = PropertyType::DateTime;
}

/// Scalar JSON binds as the matching scalar value; only arrays and objects stay JSON.
impl ToValue for JsonValue {
    fn to_value(&self) -> RowValues {
        match self {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(*b),
            JsonValue::Number(n) => n
                .as_i64()
                .map(RowValues::Int)
                .or_else(|| n.as_f64().map(RowValues::Float))
                .unwrap_or_else(|| RowValues::Text(n.to_string())),
            JsonValue::String(s) => RowValues::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => RowValues::JSON(self.clone()),
        }
    }
}

/// Generic objects accept every raw value.
///
/// Text is parsed only when it holds a JSON array or object; any other text stays a string.
impl FromValue for JsonValue {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        Ok(match value {
            RowValues::JSON(json) => json,
            RowValues::Null => JsonValue::Null,
            RowValues::Bool(b) => JsonValue::Bool(b),
            RowValues::Int(i) => JsonValue::from(i),
            RowValues::Enum(ordinal) => JsonValue::from(ordinal),
            RowValues::Float(f) => JsonValue::from(f),
            RowValues::Text(s) => match serde_json::from_str::<JsonValue>(&s) {
                Ok(json @ (JsonValue::Array(_) | JsonValue::Object(_))) => json,
                _ => JsonValue::String(s),
            },
            other @ (RowValues::Decimal(_) | RowValues::Timestamp(_) | RowValues::Blob(_)) => {
                JsonValue::String(other.to_string())
            }
        })
    }
}

impl BindableField for JsonValue {
    const DECLARED_TYPE: PropertyType = PropertyType::Object;
}

impl ToValue for RowValues {
    fn to_value(&self) -> RowValues {
        self.clone()
    }
}

impl FromValue for RowValues {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        Ok(value)
    }
}

impl BindableField for RowValues {
    const DECLARED_TYPE: PropertyType = PropertyType::Object;
}

/// `None` binds as NULL and NULL reads back as `None`.
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> RowValues {
        self.as_ref().map_or(RowValues::Null, ToValue::to_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: RowValues) -> Result<Self, SqlBinderError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: BindableField> BindableField for Option<T> {
    const DECLARED_TYPE: PropertyType = T::DECLARED_TYPE;
}

/// Integer ordinal of an enumeration value.
///
/// Whole numbers and integer text convert; fractional numbers round half to even, but
/// fractional text is rejected.
///
/// # Errors
///
/// Returns `SqlBinderError::CoercionError` for values with no integer ordinal.
pub fn to_ordinal(value: &RowValues) -> Result<i32, SqlBinderError> {
    let ordinal = match value {
        RowValues::Enum(ordinal) => Some(*ordinal),
        RowValues::Int(i) => i32::try_from(*i).ok(),
        RowValues::Bool(b) => Some(i32::from(*b)),
        RowValues::Float(f) => round_to_i32(*f),
        RowValues::Decimal(d) => d
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointNearestEven)
            .to_i32(),
        RowValues::Text(s) => s.trim().parse::<i32>().ok(),
        RowValues::Timestamp(_) | RowValues::Null | RowValues::JSON(_) | RowValues::Blob(_) => {
            None
        }
    };
    ordinal.ok_or_else(|| mismatch("enumeration ordinal", value))
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i32(f: f64) -> Option<i32> {
    let rounded = f.round_ties_even();
    if rounded.is_finite() && rounded >= f64::from(i32::MIN) && rounded <= f64::from(i32::MAX) {
        Some(rounded as i32)
    } else {
        None
    }
}

/// Implement the bindable field traits for a fieldless enum stored by ordinal.
///
/// Variants are listed in any order; each is matched against its own discriminant.
/// ```rust
/// use sql_binder::impl_bindable_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Status {
///     #[default]
///     Pending = 0,
///     Active = 1,
///     Closed = 3,
/// }
///
/// impl_bindable_enum!(Status { Pending, Active, Closed });
/// ```
#[macro_export]
macro_rules! impl_bindable_enum {
    ($enum:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::binding::ToValue for $enum {
            fn to_value(&self) -> $crate::types::RowValues {
                $crate::types::RowValues::Enum(*self as i32)
            }
        }

        impl $crate::binding::FromValue for $enum {
            fn from_value(
                value: $crate::types::RowValues,
            ) -> ::std::result::Result<Self, $crate::error::SqlBinderError> {
                let ordinal = $crate::binding::to_ordinal(&value)?;
                $(
                    if ordinal == $enum::$variant as i32 {
                        return Ok($enum::$variant);
                    }
                )+
                Err($crate::error::SqlBinderError::CoercionError(format!(
                    "{} has no variant with ordinal {}",
                    stringify!($enum),
                    ordinal
                )))
            }
        }

        impl $crate::binding::BindableField for $enum {
            const DECLARED_TYPE: $crate::types::PropertyType = $crate::types::PropertyType::Enum;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_none_to_null_and_back() {
        let absent: Option<String> = None;
        assert_eq!(absent.to_value(), RowValues::Null);
        assert_eq!(Option::<i64>::from_value(RowValues::Null).unwrap(), None);
        assert_eq!(
            Option::<i64>::from_value(RowValues::Int(4)).unwrap(),
            Some(4)
        );
    }

    #[test]
    fn setters_convert_representations() {
        assert_eq!(f64::from_value(RowValues::Int(2)).unwrap(), 2.0);
        assert_eq!(
            Decimal::from_value(RowValues::Text("12.50".into())).unwrap(),
            Decimal::new(1250, 2)
        );
        assert!(NaiveDateTime::from_value(RowValues::Text("2024-01-02 03:04:05".into())).is_ok());
        assert!(bool::from_value(RowValues::Int(1)).unwrap());
    }

    #[test]
    fn setters_reject_mismatches() {
        assert!(matches!(
            String::from_value(RowValues::Int(1)),
            Err(SqlBinderError::CoercionError(_))
        ));
        assert!(i32::from_value(RowValues::Int(i64::MAX)).is_err());
        assert!(i64::from_value(RowValues::Null).is_err());
    }

    #[test]
    fn ordinal_coercion() {
        assert_eq!(to_ordinal(&RowValues::Int(3)).unwrap(), 3);
        assert_eq!(to_ordinal(&RowValues::Text(" 2 ".into())).unwrap(), 2);
        assert_eq!(to_ordinal(&RowValues::Float(2.5)).unwrap(), 2);
        assert_eq!(to_ordinal(&RowValues::Bool(true)).unwrap(), 1);
        assert!(to_ordinal(&RowValues::Text("active".into())).is_err());
        assert!(matches!(
            to_ordinal(&RowValues::Text("3.5".into())),
            Err(SqlBinderError::CoercionError(_))
        ));
        assert!(to_ordinal(&RowValues::Null).is_err());
    }

    #[test]
    fn generic_object_accepts_anything() {
        assert_eq!(
            JsonValue::from_value(RowValues::Text("{\"a\":1}".into())).unwrap(),
            serde_json::json!({"a": 1})
        );
        assert_eq!(
            JsonValue::from_value(RowValues::Text("plain".into())).unwrap(),
            JsonValue::String("plain".into())
        );
        assert_eq!(
            JsonValue::from_value(RowValues::Text("42".into())).unwrap(),
            JsonValue::String("42".into())
        );
    }

    #[test]
    fn generic_object_scalars_bind_as_scalars() {
        assert_eq!(JsonValue::String("hello".into()).to_value(), RowValues::Text("hello".into()));
        assert_eq!(serde_json::json!(42).to_value(), RowValues::Int(42));
        assert_eq!(serde_json::json!(1.5).to_value(), RowValues::Float(1.5));
        assert_eq!(serde_json::json!(true).to_value(), RowValues::Bool(true));
        assert_eq!(
            serde_json::json!(["a"]).to_value(),
            RowValues::JSON(serde_json::json!(["a"]))
        );
    }
}
