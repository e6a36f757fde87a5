//! # MediSupply CLI
//!
//! Validate documents, inspect operations and check persisted snapshots
//! against the MediSupply contract.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;
use medisupply_contract::ValidationConfig;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.validation.resolve(ValidationConfig::from_env());
    log::debug!(
        "Validation config: strict={}, collect_all_issues={}",
        config.strict,
        config.collect_all_issues
    );

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = commands::run(&cli.command, &config, &mut stdout) {
        eprintln!("{}", err.report());
        std::process::exit(err.exit_code());
    }
}
