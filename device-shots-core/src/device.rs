//! Device specifications and the validated device catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One device to fetch a product photo for.
///
/// Query lists are ordered best-first. The primary list goes to the primary
/// engine, the secondary list is only consulted as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Stable identifier, also the output filename stem
    pub slug: String,
    /// Human-readable model name (defaults to the slug)
    #[serde(default)]
    pub name: Option<String>,
    /// Primary-engine query strings, best to weakest
    pub primary: Vec<String>,
    /// Secondary-engine query strings, best to weakest
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl DeviceSpec {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: None,
            primary: Vec::new(),
            secondary: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_primary(mut self, query: impl Into<String>) -> Self {
        self.primary.push(query.into());
        self
    }

    pub fn with_secondary(mut self, query: impl Into<String>) -> Self {
        self.secondary.push(query.into());
        self
    }

    /// Display name, falling back to the slug.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slug)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if !is_valid_slug(&self.slug) {
            return Err(CatalogError::invalid_slug(&self.slug));
        }
        if self.primary.iter().all(|q| q.trim().is_empty()) {
            return Err(CatalogError::NoPrimaryQueries(self.slug.clone()));
        }
        Ok(())
    }
}

/// A slug must be non-empty and use only `[a-z0-9_-]`.
///
/// Slugs become file and directory names, so anything that could escape the
/// output directory (separators, dots) is refused.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// The immutable, validated list of devices for a run.
///
/// Declaration order is preserved; the run driver processes devices in
/// exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCatalog {
    devices: Vec<DeviceSpec>,
}

impl DeviceCatalog {
    /// Validate and wrap a device list.
    ///
    /// Rejects invalid slugs, duplicate slugs, and devices without any
    /// primary query (the first primary tier always runs, so it must exist).
    pub fn new(devices: Vec<DeviceSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for device in &devices {
            device.check()?;
            if !seen.insert(device.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(device.slug.clone()));
            }
        }
        Ok(Self { devices })
    }

    pub fn devices(&self) -> &[DeviceSpec] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device by slug.
    pub fn get(&self, slug: &str) -> Option<&DeviceSpec> {
        self.devices.iter().find(|d| d.slug == slug)
    }

    /// Restrict the catalog to the given slugs, keeping catalog order.
    ///
    /// Unknown slugs are an error rather than silently ignored.
    pub fn retain_slugs<S: AsRef<str>>(&self, slugs: &[S]) -> Result<Self, CatalogError> {
        for slug in slugs {
            if self.get(slug.as_ref()).is_none() {
                return Err(CatalogError::UnknownSlug(slug.as_ref().to_string()));
            }
        }
        let devices = self
            .devices
            .iter()
            .filter(|d| slugs.iter().any(|s| s.as_ref() == d.slug))
            .cloned()
            .collect();
        Ok(Self { devices })
    }
}

#[cfg(test)]
#[path = "tests/device_tests.rs"]
mod tests;
