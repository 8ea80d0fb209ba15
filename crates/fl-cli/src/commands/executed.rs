//! Executed command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, ListArgs};
use crate::commands::common::Project;

/// Execute the executed command
pub async fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let migrator = project.migrator(global)?;
    let status = migrator.status().await?;

    if args.json {
        let output = serde_json::json!({
            "executed": status.executed,
            "orphans": status.orphans,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if status.executed.is_empty() && status.orphans.is_empty() {
        println!("No executed migrations.");
        return Ok(());
    }
    for record in &status.executed {
        println!(
            "{}  {}",
            record.applied_at.format("%Y-%m-%d %H:%M:%S"),
            record.name
        );
    }
    for record in &status.orphans {
        println!(
            "{}  {}  (orphan: no migration file)",
            record.applied_at.format("%Y-%m-%d %H:%M:%S"),
            record.name
        );
    }
    Ok(())
}
