use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_down_all() {
    let cli = Cli::try_parse_from(["fledge", "down", "--all"]).unwrap();
    assert!(matches!(cli.command, Commands::Down(DownArgs { all: true, to: None })));
}

#[test]
fn test_down_to_conflicts_with_all() {
    let result = Cli::try_parse_from(["fledge", "down", "--all", "--to", "01.a.sql"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["fledge", "up", "--to", "02.b.sql", "-d", "x.duckdb", "-v"])
        .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.database.as_deref(), Some("x.duckdb"));
    assert!(matches!(cli.command, Commands::Up(UpArgs { to: Some(ref t) }) if t == "02.b.sql"));
}

#[test]
fn test_create_requires_name() {
    assert!(Cli::try_parse_from(["fledge", "create"]).is_err());
}
