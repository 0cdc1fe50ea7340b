//! `SQLite` backend built on `rusqlite`.
//!
//! Statements use SQLite's native `@name` parameters, so SQL written for the binder runs
//! unchanged.

mod config;
mod connection;
mod params;
mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder, SqliteProvider};
pub use connection::{SqliteCommandError, SqliteConnection};
pub use params::{Params, bind_named_params, row_value_to_sqlite_value};
pub use query::{build_result_set, sqlite_extract_value_sync};
