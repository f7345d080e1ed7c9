//! Main entry point for keydiff CLI

use clap::Parser;
use keydiff::cli::Cli;
use keydiff::commands::execute_command;
use keydiff::duckdb_config;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still applies; --verbose raises the default to debug
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = duckdb_config::init_duckdb() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = execute_command(cli.command, !cli.no_progress) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
