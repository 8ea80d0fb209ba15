//! Configuration types and parsing for fledge.yml

use crate::error::{CoreError, CoreResult};
use crate::ledger_table::LedgerTableName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names tried by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["fledge.yml", "fledge.yaml"];

/// Project configuration from fledge.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the up migrations (and their `down/` counterparts),
    /// relative to the project root
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Ledger table recording applied migrations.
    ///
    /// Required: there is no implicit default table name.
    pub ledger_table: LedgerTableName,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// How migrations in one run are grouped into transactions
    #[serde(default)]
    pub transaction: TransactionStrategy,

    /// Verify fingerprints of already-applied migrations before applying
    /// pending ones
    #[serde(default)]
    pub verify_on_up: bool,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Transaction grouping for a single up/down run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStrategy {
    /// Each migration and its ledger write commit on their own; a failure
    /// rolls back only the failing migration
    #[default]
    PerMigration,
    /// All migrations of the run share one transaction; any failure rolls
    /// back the whole run, including steps already reported as `migrated`
    /// or `reverted` to the event sink
    Single,
}

impl std::fmt::Display for TransactionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStrategy::PerMigration => write!(f, "per_migration"),
            TransactionStrategy::Single => write!(f, "single"),
        }
    }
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for fledge.yml or fledge.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for file_name in CONFIG_FILE_NAMES {
            let candidate = dir.join(file_name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Absolute migrations directory for a project rooted at `root`
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Database path, resolved against `root` unless in-memory or absolute
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" || Path::new(&self.database.path).is_absolute() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
