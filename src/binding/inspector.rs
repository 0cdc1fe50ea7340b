use crate::error::SqlBinderError;
use crate::types::{PropertyType, RowValues};

/// One bindable property: its name and declared value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub declared_type: PropertyType,
}

impl PropertyInfo {
    #[must_use]
    pub const fn new(name: &'static str, declared_type: PropertyType) -> Self {
        Self {
            name,
            declared_type,
        }
    }

    /// Case-insensitive comparison of a result column caption with the property name.
    #[must_use]
    pub fn matches_caption(&self, caption: &str) -> bool {
        self.name.eq_ignore_ascii_case(caption)
            || self.name.to_lowercase() == caption.to_lowercase()
    }
}

/// A value whose fields can be read into statement parameters and written from result rows.
///
/// Usually implemented with [`impl_bindable!`](crate::impl_bindable). Bare `String`, `&str`,
/// `i32` and `i64` implement it as scalar sources with no properties.
pub trait Bindable {
    /// Supported properties in declaration order.
    fn properties() -> &'static [PropertyInfo];

    /// Current value of `name`, or `None` if there is no such property.
    fn get_property(&self, name: &str) -> Option<RowValues>;

    /// Assign `value` to the property `name`.
    ///
    /// # Errors
    ///
    /// Returns `SqlBinderError::PropertyNotFound` for an unknown name, or
    /// `SqlBinderError::CoercionError` when the value cannot be represented by the field.
    fn set_property(&mut self, name: &str, value: RowValues) -> Result<(), SqlBinderError>;

    /// The raw value of a bare text or integer source.
    fn scalar_value(&self) -> Option<RowValues> {
        None
    }
}

/// Supported properties of `T`, in declaration order.
#[must_use]
pub fn supported_properties<T: Bindable + ?Sized>() -> &'static [PropertyInfo] {
    T::properties()
}

macro_rules! impl_scalar_source {
    ($ty:ty, $value:ident => $raw:expr) => {
        impl Bindable for $ty {
            fn properties() -> &'static [PropertyInfo] {
                &[]
            }

            fn get_property(&self, _name: &str) -> Option<RowValues> {
                None
            }

            fn set_property(
                &mut self,
                name: &str,
                _value: RowValues,
            ) -> Result<(), SqlBinderError> {
                Err(SqlBinderError::PropertyNotFound(format!(
                    "{name} (scalar {} has no properties)",
                    stringify!($ty)
                )))
            }

            fn scalar_value(&self) -> Option<RowValues> {
                let $value = self;
                Some($raw)
            }
        }
    };
}

impl_scalar_source!(str, v => RowValues::Text(v.to_string()));
impl_scalar_source!(String, v => RowValues::Text(v.clone()));
impl_scalar_source!(i32, v => RowValues::Int(i64::from(*v)));
impl_scalar_source!(i64, v => RowValues::Int(*v));

/// Implement [`Bindable`] for a struct by listing the fields the binder may see.
///
/// Every listed field type must implement
/// [`BindableField`](crate::binding::BindableField). Fields left out are invisible.
/// ```rust
/// use sql_binder::impl_bindable;
///
/// #[derive(Debug, Default)]
/// struct User {
///     id: i64,
///     name: String,
///     active: bool,
///     scratch: Vec<u8>,
/// }
///
/// impl_bindable!(User { id: i64, name: String, active: bool });
/// ```
#[macro_export]
macro_rules! impl_bindable {
    ($ty:ident { $($field:ident : $field_ty:ty),* $(,)? }) => {
        impl $crate::binding::Bindable for $ty {
            fn properties() -> &'static [$crate::binding::PropertyInfo] {
                const PROPERTIES: &[$crate::binding::PropertyInfo] = &[
                    $(
                        $crate::binding::PropertyInfo::new(
                            stringify!($field),
                            <$field_ty as $crate::binding::BindableField>::DECLARED_TYPE,
                        ),
                    )*
                ];
                PROPERTIES
            }

            fn get_property(&self, name: &str) -> Option<$crate::types::RowValues> {
                match name {
                    $(
                        stringify!($field) => Some($crate::binding::ToValue::to_value(&self.$field)),
                    )*
                    _ => None,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: $crate::types::RowValues,
            ) -> ::std::result::Result<(), $crate::error::SqlBinderError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field =
                                <$field_ty as $crate::binding::FromValue>::from_value(value)
                                    .map_err(|e| match e {
                                        $crate::error::SqlBinderError::CoercionError(msg) => {
                                            $crate::error::SqlBinderError::CoercionError(format!(
                                                "{}.{}: {}",
                                                stringify!($ty),
                                                stringify!($field),
                                                msg
                                            ))
                                        }
                                        other => other,
                                    })?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::error::SqlBinderError::PropertyNotFound(format!(
                        "{}.{}",
                        stringify!($ty),
                        name
                    ))),
                }
            }
        }
    };
}
