//! Convention-based binding between plain structs and SQL.
//!
//! Parameters are inferred by scanning statement text for `@name` placeholders that
//! match a source struct's properties; result columns are matched back onto struct
//! properties by name, ignoring case. No mapping configuration is involved.
//!
//! ```rust,no_run
//! use sql_binder::prelude::*;
//! use sql_binder::impl_bindable;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     active: bool,
//! }
//! impl_bindable!(User { id: i64, name: String, active: bool });
//!
//! # fn demo() -> Result<(), SqlBinderError> {
//! let binder = SqlBinder::new(SqliteProvider::builder("app.db".into()).build());
//! let ann = User { id: 7, name: "Ann".into(), active: true };
//! binder.execute_with("UPDATE users SET name = @name, active = @active WHERE id = @id", &ann)?;
//! let users: Vec<User> = binder.fetch_list_with("SELECT * FROM users WHERE id = @id", &7_i64)?;
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod prelude;
pub mod provider;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod typed;
pub mod types;

pub use binding::{Bindable, ParameterSet, bind_parameters, bind_row};
pub use error::SqlBinderError;
pub use executor::SqlBinder;
pub use results::{CustomDbRow, ResultSet};
pub use types::{PropertyType, RowValues};
