//! Sources of migration definitions.
//!
//! A [`DirectoryLoader`] reads a migrations directory laid out as
//!
//! ```text
//! <dir>/2024.01.01T00.00.00.create_users.sql        up
//! <dir>/down/2024.01.01T00.00.00.create_users.sql   down (optional)
//! ```
//!
//! Definitions are re-read on every call so that content edits show up as
//! fingerprint drift.

use crate::error::{EngineError, EngineResult};
use crate::migration::MigrationDefinition;
use chrono::Utc;
use fl_core::templates::{migration_file_name, SQL_DOWN, SQL_UP};
use fl_core::{CoreError, EventSink, MigrationEvent, MigrationName};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the subdirectory holding down migrations
pub const DOWN_DIR: &str = "down";

/// Supplies the full list of migration definitions
pub trait MigrationLoader: Send + Sync {
    /// All known definitions. Order does not matter; the engine sorts by name.
    fn list_definitions(&self) -> EngineResult<Vec<MigrationDefinition>>;

    /// Scaffold a new migration named `name`, returning its path.
    ///
    /// Sources that are not backed by files keep the default, which fails
    /// with [`EngineError::CreateUnsupported`].
    fn create(&self, name: &str, events: &dyn EventSink) -> EngineResult<PathBuf> {
        let _ = (name, events);
        Err(EngineError::CreateUnsupported)
    }
}

impl MigrationLoader for Vec<MigrationDefinition> {
    fn list_definitions(&self) -> EngineResult<Vec<MigrationDefinition>> {
        Ok(self.clone())
    }
}

/// Loads `*.sql` migrations from a directory, plus any procedural
/// migrations registered in code
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
    procedures: Vec<MigrationDefinition>,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            procedures: Vec::new(),
        }
    }

    /// Merge definitions built in code into every listing
    pub fn with_procedures(mut self, procedures: Vec<MigrationDefinition>) -> Self {
        self.procedures.extend(procedures);
        self
    }

    /// The migrations directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_sql_files(&self) -> EngineResult<Vec<MigrationDefinition>> {
        if !self.dir.is_dir() {
            log::warn!(
                "Migrations directory {} does not exist, no migrations loaded",
                self.dir.display()
            );
            return Ok(Vec::new());
        }

        let mut definitions = Vec::new();
        for path in sql_files(&self.dir)? {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping migration with non UTF-8 name: {}", path.display());
                continue;
            };
            let name = MigrationName::parse(file_name)?;
            let up = read(&path)?;
            let down_path = self.dir.join(DOWN_DIR).join(file_name);
            let down = if down_path.is_file() {
                Some(read(&down_path)?)
            } else {
                None
            };
            log::debug!(
                "Loaded migration {} (down: {})",
                name,
                if down.is_some() { "yes" } else { "no" }
            );
            definitions.push(MigrationDefinition::sql(name, up, down).with_path(path));
        }

        self.warn_unmatched_down_files(&definitions)?;
        Ok(definitions)
    }

    fn warn_unmatched_down_files(&self, definitions: &[MigrationDefinition]) -> EngineResult<()> {
        let down_dir = self.dir.join(DOWN_DIR);
        if !down_dir.is_dir() {
            return Ok(());
        }
        let known: HashSet<&str> = definitions.iter().map(|d| d.name().as_str()).collect();
        for path in sql_files(&down_dir)? {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !known.contains(name) {
                log::warn!(
                    "Down migration {} has no matching up migration",
                    path.display()
                );
            }
        }
        Ok(())
    }
}

impl MigrationLoader for DirectoryLoader {
    fn list_definitions(&self) -> EngineResult<Vec<MigrationDefinition>> {
        let mut definitions = self.read_sql_files()?;
        definitions.extend(self.procedures.iter().cloned());
        Ok(definitions)
    }

    /// Scaffold a new up/down migration pair from the templates.
    ///
    /// Returns the path of the up file. Never overwrites an existing file.
    fn create(&self, name: &str, events: &dyn EventSink) -> EngineResult<PathBuf> {
        let file_name =
            migration_file_name(Utc::now(), name).ok_or_else(|| CoreError::InvalidMigrationName {
                name: name.to_string(),
                reason: "no letters, digits, '_' or '-' left after sanitizing".to_string(),
            })?;

        let down_dir = self.dir.join(DOWN_DIR);
        std::fs::create_dir_all(&down_dir).map_err(|e| io_error(&down_dir, e))?;

        let up_path = self.dir.join(&file_name);
        let down_path = down_dir.join(&file_name);
        write_new(&up_path, SQL_UP)?;
        write_new(&down_path, SQL_DOWN)?;
        log::info!("Created migration {}", up_path.display());

        events.emit(&MigrationEvent::Created {
            path: up_path.display().to_string(),
        });
        Ok(up_path)
    }
}

/// Regular `*.sql` files directly inside `dir`
fn sql_files(dir: &Path) -> EngineResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read(path: &Path) -> EngineResult<String> {
    std::fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn write_new(path: &Path, content: &str) -> EngineResult<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| io_error(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
