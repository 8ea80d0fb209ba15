//! Human-readable rendering of the migration event stream.
//!
//! Known events become one aligned line each:
//!
//! ```text
//! migrating 2022.08.25T12.51.47.test.sql
//! migrated  2022.08.25T12.51.47.test.sql in 0.024 s
//! up migration completed, applied 1 migrations.
//! ```
//!
//! Fields beyond the ones a line shows follow on a second line as a JSON
//! object. Unknown events print as raw JSON.

use fl_core::{EventSink, MigrationEvent};
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;

/// Render one event as output lines
pub(crate) fn render(event: &MigrationEvent) -> Vec<String> {
    match event {
        MigrationEvent::Created { path } => vec![format!("created   {path}")],
        MigrationEvent::Migrating { name } => vec![format!("migrating {name}")],
        MigrationEvent::Migrated {
            name,
            duration_seconds,
        } => vec![format!("migrated  {name} in {duration_seconds} s")],
        MigrationEvent::Reverting { name } => vec![format!("reverting {name}")],
        MigrationEvent::Reverted {
            name,
            duration_seconds,
        } => vec![format!("reverted  {name} in {duration_seconds} s")],
        MigrationEvent::Up {
            message,
            total_migrations,
        } => summary("up", message, *total_migrations),
        MigrationEvent::Down {
            message,
            total_migrations,
        } => summary("down", message, *total_migrations),
        MigrationEvent::Other(value) => vec![value.to_string()],
    }
}

fn summary(direction: &str, message: &str, total: Option<usize>) -> Vec<String> {
    let mut lines = vec![format!("{direction} migration completed, {message}")];
    if let Some(total) = total {
        lines.push(json!({ "totalMigrations": total }).to_string());
    }
    lines
}

/// Event sink that writes rendered lines to a writer (stdout by default)
pub(crate) struct PrettySink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl PrettySink {
    pub(crate) fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub(crate) fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl EventSink for PrettySink {
    fn emit(&self, event: &MigrationEvent) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for line in render(event) {
            if let Err(e) = writeln!(out, "{line}") {
                log::warn!("Failed to write {} event: {e}", event.kind().unwrap_or("unknown"));
                return;
            }
        }
        let _ = out.flush();
    }
}

#[cfg(test)]
#[path = "pretty_test.rs"]
mod tests;
