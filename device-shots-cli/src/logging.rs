//! Logger setup: console output through `log`, optionally teed to a file.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::LevelFilter;

use crate::error::CliError;

/// Targets that log every request at info level.
const NOISY_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "rustls", "h2"];

/// Install the global logger.
///
/// Normal output is plain `log::info!` lines on stdout. `verbose` adds
/// debug messages and timestamps; `quiet` keeps warnings and errors only.
/// With a `logfile`, every line is also written there with ANSI codes
/// stripped. `RUST_LOG` still overrides per-module levels.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let file = match logfile {
        Some(path) => Some(Mutex::new(File::create(path).map_err(|e| {
            CliError::config(format!("Cannot open log file {}: {}", path.display(), e))
        })?)),
        None => None,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    for target in NOISY_TARGETS {
        builder.filter_module(target, LevelFilter::Warn);
    }
    builder.parse_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format(move |buf, record| {
        let line = if verbose {
            format!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            record.args().to_string()
        };
        if let Some(file) = &file {
            if let Ok(mut f) = file.lock() {
                let _ = f.write_all(&strip_ansi_escapes::strip(line.as_bytes()));
                let _ = f.write_all(b"\n");
            }
        }
        writeln!(buf, "{}", line)
    });
    builder
        .try_init()
        .map_err(|e| CliError::config(format!("Logger already initialized: {}", e)))
}
