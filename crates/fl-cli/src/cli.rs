//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Fledge - versioned SQL migrations with a fingerprinted ledger
#[derive(Parser, Debug)]
#[command(name = "fledge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true, env = "FLEDGE_CONFIG")]
    pub config: Option<String>,

    /// Override database path
    #[arg(short, long, global = true, env = "FLEDGE_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List migrations that have not been applied
    Pending(ListArgs),

    /// List applied migrations and orphaned ledger records
    Executed(ListArgs),

    /// Apply pending migrations
    Up(UpArgs),

    /// Revert applied migrations (the most recent one by default)
    Down(DownArgs),

    /// Update ledger fingerprints to match edited migration files
    Repair(RepairArgs),

    /// Scaffold a new migration and its down counterpart
    Create(CreateArgs),
}

/// Arguments for the pending and executed commands
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop after applying this migration
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Revert back to and including this migration
    #[arg(long, conflicts_with = "all")]
    pub to: Option<String>,

    /// Revert every applied migration
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the repair command
#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Report drift without updating the ledger
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name, e.g. add_users
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
