use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

pub(crate) fn run_list(
    settings_file: Option<&Path>,
    devices_file: Option<&Path>,
) -> Result<(), CliError> {
    let config = super::load_config(settings_file, devices_file)?;
    let search = &config.settings.search;

    log::info!("Devices ({}):", config.catalog.len());
    for device in config.catalog.devices() {
        log::info!("");
        log::info!(
            "  {} [{}]",
            device.slug.if_supports_color(Stdout, |t| t.bold()),
            device.display_name().if_supports_color(Stdout, |t| t.cyan()),
        );
        for (tier, query) in device.primary.iter().enumerate() {
            log::info!("    {}_{}: {}", search.primary_engine, tier, query);
        }
        for (tier, query) in device.secondary.iter().enumerate() {
            log::info!(
                "    {}",
                format!("{}_{}: {}", search.secondary_engine, tier, query)
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}
