//! fsync CLI - multi-host synchronization supervisor
//!
//! Usage: fsync [COMMAND] -f <hosts.json> -k <key> -j <known_hosts>
//!
//! Commands:
//!   run     Verify every host, then watch and sync (default)
//!   config  Show the resolved host configuration

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;
mod ui;

use cli::{Cli, Commands, RunArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", ui::error::format_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log.as_deref())?;
    let settings = commands::resolve_settings(&cli)?;

    match cli.command {
        None => commands::run::cmd_run(settings, &RunArgs::default()),
        Some(Commands::Run(args)) => commands::run::cmd_run(settings, &args),
        Some(Commands::Config { json }) => commands::config::cmd_config(&settings, json),
    }
}
