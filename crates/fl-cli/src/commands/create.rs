//! Create command implementation

use anyhow::{Context, Result};
use fl_engine::{DirectoryLoader, MigrationLoader};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::Project;
use crate::pretty::PrettySink;

/// Execute the create command
pub fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let loader = DirectoryLoader::new(project.migrations_dir());
    loader
        .create(&args.name, &PrettySink::stdout())
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;
    Ok(())
}
