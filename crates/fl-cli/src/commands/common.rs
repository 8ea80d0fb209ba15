//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use fl_core::{Config, MigrationName};
use fl_db::{Database, DuckDbBackend};
use fl_engine::{Migrator, Target};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;
use crate::pretty::PrettySink;

/// A loaded project: its configuration and the directory paths resolve
/// against
pub(crate) struct Project {
    pub(crate) config: Config,
    pub(crate) root: PathBuf,
}

impl Project {
    /// Load from `--config` if given, else from the project directory
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        match &global.config {
            Some(path) => {
                let path = Path::new(path);
                let config = Config::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                let root = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Ok(Self { config, root })
            }
            None => {
                let root = PathBuf::from(&global.project_dir);
                let config = Config::load_from_dir(&root).context("Failed to load project")?;
                Ok(Self { config, root })
            }
        }
    }

    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir(&self.root)
    }

    /// Open the database (`--database` wins over the config file)
    pub(crate) fn open_database(&self, global: &GlobalArgs) -> Result<Arc<dyn Database>> {
        let path = global
            .database
            .clone()
            .unwrap_or_else(|| self.config.database_path(&self.root));
        log::debug!("Opening database {path}");
        let db = DuckDbBackend::new(&path)
            .with_context(|| format!("Failed to connect to database {path}"))?;
        Ok(Arc::new(db))
    }

    /// Migrator printing progress to stdout
    pub(crate) fn migrator(&self, global: &GlobalArgs) -> Result<Migrator> {
        let db = self.open_database(global)?;
        Ok(Migrator::from_config(db, &self.config, &self.root)
            .with_events(Arc::new(PrettySink::stdout())))
    }
}

/// Parse a `--to` argument into a target
pub(crate) fn target_to(name: Option<&str>) -> Result<Option<Target>> {
    name.map(|n| {
        MigrationName::parse(n)
            .map(Target::To)
            .with_context(|| format!("Invalid target migration '{n}'"))
    })
    .transpose()
}
