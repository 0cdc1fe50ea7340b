//! The binding engine: property discovery, parameter inference and row materialisation.

mod inspector;
mod params;
mod row;
mod values;

pub use inspector::{Bindable, PropertyInfo, supported_properties};
pub use params::{
    PLACEHOLDER_TERMINATORS, ParameterSet, bind_parameters, first_placeholder_name,
    references_placeholder,
};
pub use row::{bind_row, coerce_column};
pub use values::{BindableField, FromValue, ToValue, to_ordinal};
