//! Repair command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, RepairArgs};
use crate::commands::common::Project;

/// Execute the repair command
pub async fn execute(args: &RepairArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let migrator = project.migrator(global)?;
    let report = migrator.repair(args.dry_run).await?;

    if report.is_clean() {
        println!("All fingerprints match.");
        return Ok(());
    }
    let verb = if report.dry_run { "would update" } else { "updated" };
    for change in &report.changes {
        println!(
            "{verb} {}: {} -> {}",
            change.name, change.old_fingerprint, change.new_fingerprint
        );
    }
    Ok(())
}
