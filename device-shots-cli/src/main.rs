//! device-shots CLI
//!
//! Fetches one clean product photo per laptop model from web image search.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands, ConfigAction, RunArgs};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    if let Err(e) = dispatch(cli) {
        log::error!(
            "{} {}",
            "Error:".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let settings_file = cli.config.as_deref();
    let devices_file = cli.devices_file.as_deref();

    match cli.command {
        None => commands::run::run_shots(settings_file, devices_file, RunArgs::default(), cli.quiet),
        Some(Commands::Run(args)) => {
            commands::run::run_shots(settings_file, devices_file, args, cli.quiet)
        }
        Some(Commands::List) => commands::list::run_list(settings_file, devices_file),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::run_config_show(settings_file),
            ConfigAction::Path => {
                commands::config::run_config_path(settings_file);
                Ok(())
            }
            ConfigAction::Init { force } => commands::config::run_config_init(settings_file, force),
        },
    }
}
