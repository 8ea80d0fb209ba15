//! fl-core - Core library for Fledge
//!
//! This crate provides the shared types used across all Fledge components:
//! content fingerprints, validated migration and ledger table names, project
//! configuration, the structured migration event stream, and the templates
//! used when scaffolding new migrations.

pub mod checksum;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger_table;
pub mod migration_name;
mod newtype_string;
pub mod sql_utils;
pub mod templates;

pub use checksum::fingerprint;
pub use config::{Config, DatabaseConfig, TransactionStrategy};
pub use error::{CoreError, CoreResult};
pub use event::{EventSink, LogSink, MemorySink, MigrationEvent, NullSink};
pub use ledger_table::LedgerTableName;
pub use migration_name::MigrationName;
