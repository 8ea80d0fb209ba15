//! The migrator: one datastore, one migration source, one ledger table.

use crate::error::EngineResult;
use crate::ledger::{LedgerRecord, LedgerStore};
use crate::loader::{DirectoryLoader, MigrationLoader};
use crate::migration::MigrationDefinition;
use crate::set::MigrationSet;
use fl_core::{Config, EventSink, LedgerTableName, MigrationName, NullSink, TransactionStrategy};
use fl_db::Database;
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Explicit migrator settings.
///
/// The ledger table name has no default: every caller states which table
/// records its migrations.
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    pub ledger_table: LedgerTableName,
    pub strategy: TransactionStrategy,
    pub verify_on_up: bool,
}

impl MigratorOptions {
    /// Per-migration transactions, no verification on up
    pub fn new(ledger_table: LedgerTableName) -> Self {
        Self {
            ledger_table,
            strategy: TransactionStrategy::default(),
            verify_on_up: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            ledger_table: config.ledger_table.clone(),
            strategy: config.transaction,
            verify_on_up: config.verify_on_up,
        }
    }

    pub fn with_strategy(mut self, strategy: TransactionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_verify_on_up(mut self, verify_on_up: bool) -> Self {
        self.verify_on_up = verify_on_up;
        self
    }
}

/// Pending, executed and orphaned migrations read in one pass
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub pending: Vec<MigrationName>,
    pub executed: Vec<LedgerRecord>,
    pub orphans: Vec<LedgerRecord>,
}

/// Applies, reverts and repairs migrations against one datastore
pub struct Migrator {
    db: Arc<dyn Database>,
    loader: Box<dyn MigrationLoader>,
    options: MigratorOptions,
    events: Arc<dyn EventSink>,
}

impl Migrator {
    /// Create a migrator that discards events; see [`Migrator::with_events`]
    pub fn new(
        db: Arc<dyn Database>,
        loader: impl MigrationLoader + 'static,
        options: MigratorOptions,
    ) -> Self {
        Self {
            db,
            loader: Box::new(loader),
            options,
            events: Arc::new(NullSink),
        }
    }

    /// Migrator over the project's migrations directory with options from
    /// `config`
    pub fn from_config(db: Arc<dyn Database>, config: &Config, root: &Path) -> Self {
        Self::new(
            db,
            DirectoryLoader::new(config.migrations_dir(root)),
            MigratorOptions::from_config(config),
        )
    }

    /// Send progress events to `events`
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn options(&self) -> &MigratorOptions {
        &self.options
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Create the ledger table if it does not exist yet
    pub async fn ensure_table(&self) -> EngineResult<()> {
        self.ledger().ensure_table().await
    }

    /// Migrations not yet applied, ascending by name
    pub async fn pending(&self) -> EngineResult<Vec<MigrationDefinition>> {
        let set = self.load_set().await?;
        Ok(set.pending().into_iter().cloned().collect())
    }

    /// Ledger records of applied migrations that still exist, ascending by
    /// name
    pub async fn executed(&self) -> EngineResult<Vec<LedgerRecord>> {
        let set = self.load_set().await?;
        Ok(set.executed().into_iter().map(|(_, r)| r.clone()).collect())
    }

    pub async fn status(&self) -> EngineResult<Status> {
        let set = self.load_set().await?;
        Ok(Status {
            pending: set.pending().iter().map(|d| d.name().clone()).collect(),
            executed: set.executed().into_iter().map(|(_, r)| r.clone()).collect(),
            orphans: set.orphans().into_iter().cloned().collect(),
        })
    }

    /// Scaffold a new migration through the loader
    pub fn create(&self, name: &str) -> EngineResult<PathBuf> {
        self.loader.create(name, self.events.as_ref())
    }

    pub(crate) fn ledger(&self) -> LedgerStore<'_> {
        LedgerStore::new(self.db.as_ref(), &self.options.ledger_table)
    }

    pub(crate) fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// Current definitions, without touching the datastore
    pub(crate) fn load_definitions(&self) -> EngineResult<MigrationSet> {
        MigrationSet::new(self.loader.list_definitions()?)
    }

    /// Attach freshly read ledger records to `set`
    pub(crate) async fn attach_records(&self, set: MigrationSet) -> EngineResult<MigrationSet> {
        let ledger = self.ledger();
        ledger.ensure_table().await?;
        let set = set.with_records(ledger.list_records().await?);
        set.warn_orphans();
        Ok(set)
    }

    pub(crate) async fn load_set(&self) -> EngineResult<MigrationSet> {
        let set = self.load_definitions()?;
        self.attach_records(set).await
    }

    /// Run `body` between BEGIN and COMMIT, rolling back if it or the commit
    /// fails
    pub(crate) async fn transaction<T>(
        &self,
        body: impl Future<Output = EngineResult<T>>,
    ) -> EngineResult<T> {
        self.db.begin().await?;
        match body.await {
            Ok(value) => {
                if let Err(e) = self.db.commit().await {
                    self.rollback_quietly().await;
                    return Err(e.into());
                }
                Ok(value)
            }
            Err(e) => {
                self.rollback_quietly().await;
                Err(e)
            }
        }
    }

    async fn rollback_quietly(&self) {
        if let Err(e) = self.db.rollback().await {
            log::warn!("Rollback failed: {e}");
        }
    }
}
