//! Application settings and the per-run configuration.
//!
//! Settings live in `~/.config/device-shots/settings.toml`. Every field has
//! a default, so a missing file or a partial file is fine; only a file that
//! fails to parse is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use device_shots_core::{DeviceCatalog, Engine, SearchFilters};

use crate::ShotError;
use crate::catalog;
use crate::codec::OutputFormat;
use crate::validate::Thresholds;

/// Canonical path to the settings file: `~/.config/device-shots/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("device-shots").join("settings.toml")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Root of the raw download tree: `<raw_root>/<slug>/<engine>_<tier>/`
    pub raw_root: PathBuf,
    /// Flat directory holding one `<slug>.<ext>` per device
    pub output_dir: PathBuf,
    /// Device catalog file; the built-in catalog is used when unset
    pub devices_file: Option<PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            raw_root: PathBuf::from("images").join("raw"),
            output_dir: PathBuf::from("images"),
            devices_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Primary tiers stop once this many valid candidates are collected
    pub min_candidates: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self { min_candidates: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub primary_engine: Engine,
    pub secondary_engine: Engine,
    /// Result cap for each primary query
    pub primary_max_per_query: usize,
    /// Result cap for each secondary query (Baidu repeats itself at higher counts)
    pub secondary_max_per_query: usize,
    /// Downloader threads per query
    pub download_threads: usize,
    /// HTTP timeout per request, in seconds
    pub timeout_secs: u64,
    pub filters: SearchFilters,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            primary_engine: Engine::Bing,
            secondary_engine: Engine::Baidu,
            primary_max_per_query: 3,
            secondary_max_per_query: 2,
            download_threads: 4,
            timeout_secs: 30,
            filters: SearchFilters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Canonical format every saved image is normalized to
    pub format: OutputFormat,
    /// Encoder quality (1-100), used for JPEG
    pub quality: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub validation: Thresholds,
    pub selection: SelectionSettings,
    pub search: SearchSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default settings file
    /// is read if present, otherwise defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ShotError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = settings_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("No settings file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load settings from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ShotError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ShotError::settings(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| ShotError::settings(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, ShotError> {
        let settings: Settings =
            toml::from_str(contents).map_err(|e| ShotError::settings(e.to_string()))?;
        settings.check()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, ShotError> {
        toml::to_string_pretty(self).map_err(|e| ShotError::settings(e.to_string()))
    }

    /// Write the settings atomically (tmp file + rename).
    pub fn save_to(&self, path: &Path) -> Result<(), ShotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Reject values no run can work with.
    pub fn check(&self) -> Result<(), ShotError> {
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ShotError::settings(format!(
                "output.quality must be between 1 and 100, got {}",
                self.output.quality
            )));
        }
        if self.search.download_threads == 0 {
            return Err(ShotError::settings("search.download_threads must be at least 1"));
        }
        if self.search.primary_engine == self.search.secondary_engine {
            return Err(ShotError::settings(format!(
                "search.primary_engine and search.secondary_engine must differ, both are {}",
                self.search.primary_engine
            )));
        }
        let ratio = self.validation.min_aspect_ratio;
        if ratio.is_nan() || ratio < 0.0 {
            return Err(ShotError::settings(
                "validation.min_aspect_ratio must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Everything a run needs, loaded once at start-up and then only borrowed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub settings: Settings,
    pub catalog: DeviceCatalog,
}

impl RunConfig {
    /// Load settings, then the catalog they point at.
    ///
    /// `devices_file` overrides `paths.devices_file` from the settings.
    pub fn load(
        settings_file: Option<&Path>,
        devices_file: Option<&Path>,
    ) -> Result<Self, ShotError> {
        let settings = Settings::load(settings_file)?;
        let catalog = match devices_file.or(settings.paths.devices_file.as_deref()) {
            Some(path) => catalog::load_catalog_file(path)?,
            None => catalog::builtin_catalog()?,
        };
        Ok(Self { settings, catalog })
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
