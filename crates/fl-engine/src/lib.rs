//! fl-engine - Migration engine for Fledge
//!
//! Given an ordered set of migration definitions and a ledger table recording
//! which of them have been applied, the engine computes what is pending,
//! applies or reverts migrations under a chosen transaction strategy, and
//! detects and repairs drift between recorded and current content
//! fingerprints.
//!
//! ```no_run
//! # async fn example() -> fl_engine::EngineResult<()> {
//! use fl_core::LedgerTableName;
//! use fl_db::DuckDbBackend;
//! use fl_engine::{DirectoryLoader, Migrator, MigratorOptions, Target};
//! use std::sync::Arc;
//!
//! let db = Arc::new(DuckDbBackend::new("dev.duckdb")?);
//! let options = MigratorOptions::new(LedgerTableName::parse("migration")?);
//! let migrator = Migrator::new(db, DirectoryLoader::new("db/migrations"), options);
//!
//! let result = migrator.up(Target::Default).await?;
//! println!("applied {}", result.migrations.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ledger;
pub mod loader;
pub mod migration;
pub mod migrator;
pub mod repair;
pub mod run;
pub mod set;

pub use error::{EngineError, EngineResult, IntegrityDetail};
pub use ledger::{LedgerRecord, LedgerStore};
pub use loader::{DirectoryLoader, MigrationLoader};
pub use migration::{Direction, Effect, MigrationDefinition};
pub use migrator::{Migrator, MigratorOptions, Status};
pub use repair::RepairReport;
pub use run::{RunResult, Target};
pub use set::{FingerprintDrift, MigrationSet};
