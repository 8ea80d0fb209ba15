//! Up command implementation

use anyhow::Result;
use fl_engine::Target;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{target_to, Project};

/// Execute the up command
pub async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let target = target_to(args.to.as_deref())?.unwrap_or(Target::Default);
    let migrator = project.migrator(global)?;
    migrator.up(target).await?;
    Ok(())
}
