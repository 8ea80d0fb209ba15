//! Down command implementation

use anyhow::Result;
use fl_engine::Target;

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::{target_to, Project};

/// Execute the down command
pub async fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let target = if args.all {
        Target::All
    } else {
        target_to(args.to.as_deref())?.unwrap_or(Target::Default)
    };
    let migrator = project.migrator(global)?;
    migrator.down(target).await?;
    Ok(())
}
