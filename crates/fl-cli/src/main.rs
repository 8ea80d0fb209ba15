//! Fledge CLI - versioned SQL migrations with a fingerprinted ledger

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod pretty;

use cli::Cli;
use commands::{create, down, executed, pending, repair, up};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        cli::Commands::Pending(args) => pending::execute(args, &cli.global).await,
        cli::Commands::Executed(args) => executed::execute(args, &cli.global).await,
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Down(args) => down::execute(args, &cli.global).await,
        cli::Commands::Repair(args) => repair::execute(args, &cli.global).await,
        cli::Commands::Create(args) => create::execute(args, &cli.global),
    }
}
