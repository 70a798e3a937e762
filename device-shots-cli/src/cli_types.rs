//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use device_shots_core::Engine;

#[derive(Parser)]
#[command(name = "device-shots")]
#[command(about = "Fetch one clean product photo per laptop model", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (default: ~/.config/device-shots/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Device catalog file (default: built-in list)
    #[arg(long, global = true)]
    pub devices_file: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Runs every device when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a run; also the defaults when no subcommand is given.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct RunArgs {
    /// Only process these device slugs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Directory for the final <slug>.<ext> images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Root of the raw per-tier download tree
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Valid candidates that end the primary search early
    #[arg(long)]
    pub min_candidates: Option<usize>,

    /// Downloader threads per query
    #[arg(long)]
    pub threads: Option<usize>,

    /// Engine for the primary query list (bing, baidu)
    #[arg(long)]
    pub primary_engine: Option<Engine>,

    /// Engine for the secondary query list (bing, baidu)
    #[arg(long)]
    pub secondary_engine: Option<Engine>,

    /// Skip pixel checks and format conversion (size-only validation)
    #[arg(long)]
    pub no_codec: bool,

    /// Show the query plan without crawling
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't write device-shots.log into the output directory
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Search, validate and save an image for each device
    Run(RunArgs),

    /// List the devices and their query tiers
    List,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
