use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use device_shots_lib::{Settings, settings_path};

use crate::error::CliError;

/// Show the effective settings and where they came from.
pub(crate) fn run_config_show(settings_file: Option<&Path>) -> Result<(), CliError> {
    let path = config_path(settings_file);

    log::info!(
        "{}",
        "device-shots settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let settings = Settings::load(settings_file)?;
    for line in settings.to_toml()?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Print the settings file path on stdout, regardless of `--quiet`.
pub(crate) fn run_config_path(settings_file: Option<&Path>) {
    println!("{}", config_path(settings_file).display());
}

fn config_path(settings_file: Option<&Path>) -> PathBuf {
    settings_file
        .map(Path::to_path_buf)
        .unwrap_or_else(settings_path)
}

/// Write a settings file populated with the defaults.
pub(crate) fn run_config_init(settings_file: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = config_path(settings_file);
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Settings::default().save_to(&path)?;
    log::info!(
        "{} Settings written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
