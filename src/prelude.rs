//! Convenient imports for common functionality.

pub use crate::binding::{
    Bindable, BindableField, FromValue, ParameterSet, PropertyInfo, ToValue, bind_parameters,
    bind_row, supported_properties,
};
pub use crate::config::BinderConfig;
pub use crate::error::SqlBinderError;
pub use crate::executor::SqlBinder;
pub use crate::provider::{Connection, ConnectionProvider};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{PropertyType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteOptions, SqliteProvider};
