//! Device catalog loading.
//!
//! A catalog file is TOML with one `[[device]]` table per device:
//!
//! ```toml
//! [[device]]
//! slug = "dell_xps_13_2025"
//! name = "Dell XPS 13 (2025)"
//! primary = ["Dell XPS 13 9350 2025 laptop press official", "Dell XPS 13 2025"]
//! secondary = ["戴尔 XPS 13 2025 产品图"]
//! ```

use std::path::Path;

use serde::Deserialize;

use device_shots_core::{DeviceCatalog, DeviceSpec};

use crate::ShotError;

/// The catalog shipped with the binary.
const BUILTIN_DEVICES: &str = include_str!("devices.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "device")]
    devices: Vec<DeviceSpec>,
}

/// Parse and validate a catalog from TOML text.
pub fn parse_catalog(contents: &str) -> Result<DeviceCatalog, ShotError> {
    let file: CatalogFile = toml::from_str(contents)
        .map_err(|e| ShotError::settings(format!("Invalid device catalog: {}", e)))?;
    Ok(DeviceCatalog::new(file.devices)?)
}

/// Load a catalog from a TOML file.
pub fn load_catalog_file(path: &Path) -> Result<DeviceCatalog, ShotError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ShotError::settings(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_catalog(&contents)
}

/// The built-in catalog of laptop models.
pub fn builtin_catalog() -> Result<DeviceCatalog, ShotError> {
    parse_catalog(BUILTIN_DEVICES)
}
