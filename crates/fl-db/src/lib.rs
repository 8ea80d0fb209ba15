//! fl-db - Database abstraction layer for Fledge
//!
//! This crate provides the `Database` trait the migration engine runs
//! against, the backend-neutral `SqlValue`/`Row` types, and the DuckDB
//! implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use value::{Row, SqlValue};
