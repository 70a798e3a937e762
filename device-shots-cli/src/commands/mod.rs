pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod run;

use std::path::Path;

use device_shots_lib::RunConfig;

use crate::error::CliError;

/// Load settings and catalog, reporting where they came from.
pub(crate) fn load_config(
    settings_file: Option<&Path>,
    devices_file: Option<&Path>,
) -> Result<RunConfig, CliError> {
    let config = RunConfig::load(settings_file, devices_file)?;
    log::debug!(
        "Loaded {} device(s); raw tree {}, output {}",
        config.catalog.len(),
        config.settings.paths.raw_root.display(),
        config.settings.paths.output_dir.display()
    );
    Ok(config)
}
