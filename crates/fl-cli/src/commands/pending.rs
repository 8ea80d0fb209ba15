//! Pending command implementation

use anyhow::Result;
use serde::Serialize;

use crate::cli::{GlobalArgs, ListArgs};
use crate::commands::common::Project;

#[derive(Serialize)]
struct PendingEntry {
    name: String,
    path: Option<String>,
}

/// Execute the pending command
pub async fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let migrator = project.migrator(global)?;
    let pending = migrator.pending().await?;

    if args.json {
        let entries: Vec<PendingEntry> = pending
            .iter()
            .map(|d| PendingEntry {
                name: d.name().to_string(),
                path: d.path().map(|p| p.display().to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("No pending migrations.");
        return Ok(());
    }
    for def in &pending {
        println!("{}", def.name());
    }
    println!("\n{} pending migration(s)", pending.len());
    Ok(())
}
