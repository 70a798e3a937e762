//! Quality checks for downloaded images.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use device_shots_core::util::{aspect_ratio, format_bytes_approx};

use crate::codec::ImageCodec;

/// Fixed thresholds a downloaded file must meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum file size in bytes
    pub min_file_size: u64,
    /// Minimum pixel width
    pub min_width: u32,
    /// Minimum pixel height
    pub min_height: u32,
    /// Minimum width/height ratio; anything narrower is too portrait for a
    /// product shot
    pub min_aspect_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_file_size: 20 * 1024,
            min_width: 600,
            min_height: 400,
            min_aspect_ratio: 0.9,
        }
    }
}

/// Pass/fail plus a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub reason: String,
}

impl Verdict {
    fn pass(reason: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// A file that passed validation and can be selected as a device's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Pixel dimensions; `None` when validated without a codec
    pub dimensions: Option<(u32, u32)>,
}

/// Everything learned while validating one file.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub path: PathBuf,
    pub size: Option<u64>,
    pub dimensions: Option<(u32, u32)>,
    pub verdict: Verdict,
}

impl Inspection {
    /// The candidate, if the file passed.
    pub fn into_candidate(self) -> Option<Candidate> {
        match (self.verdict.valid, self.size) {
            (true, Some(size)) => Some(Candidate {
                path: self.path,
                size,
                dimensions: self.dimensions,
            }),
            _ => None,
        }
    }
}

/// Inspects single files against [`Thresholds`]. Pure: never writes.
pub struct Validator<'a> {
    thresholds: &'a Thresholds,
    codec: Option<&'a dyn ImageCodec>,
}

impl<'a> Validator<'a> {
    pub fn new(thresholds: &'a Thresholds, codec: Option<&'a dyn ImageCodec>) -> Self {
        Self { thresholds, codec }
    }

    /// Whether pixel-level checks are available.
    pub fn has_codec(&self) -> bool {
        self.codec.is_some()
    }

    pub fn validate(&self, path: &Path) -> Verdict {
        self.inspect(path).verdict
    }

    /// Validate a file, keeping the size and dimensions that were read.
    ///
    /// Rules, in order:
    /// 1. Without a codec: pass iff size > minimum.
    /// 2. Reject if size < minimum.
    /// 3. Reject if width or height is below the minimum.
    /// 4. Reject if width/height is below the minimum aspect ratio.
    ///
    /// A file that cannot be read or decoded is invalid, with the error as
    /// the reason.
    pub fn inspect(&self, path: &Path) -> Inspection {
        let mut inspection = Inspection {
            path: path.to_path_buf(),
            size: None,
            dimensions: None,
            verdict: Verdict::fail(""),
        };

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                inspection.verdict = Verdict::fail(format!("unreadable: {e}"));
                return inspection;
            }
        };
        inspection.size = Some(size);
        let t = self.thresholds;

        let Some(codec) = self.codec else {
            inspection.verdict = if size > t.min_file_size {
                Verdict::pass(format!(
                    "size-only check (no codec): {}",
                    format_bytes_approx(size)
                ))
            } else {
                Verdict::fail(format!(
                    "size-only check (no codec): too small, {} bytes (minimum {})",
                    size, t.min_file_size
                ))
            };
            return inspection;
        };

        if size < t.min_file_size {
            inspection.verdict = Verdict::fail(format!(
                "too small: {} bytes (minimum {})",
                size, t.min_file_size
            ));
            return inspection;
        }

        let (width, height) = match codec.dimensions(path) {
            Ok(dims) => dims,
            Err(e) => {
                inspection.verdict = Verdict::fail(e.to_string());
                return inspection;
            }
        };
        inspection.dimensions = Some((width, height));

        if width < t.min_width || height < t.min_height {
            inspection.verdict = Verdict::fail(format!(
                "too small: {}x{} (minimum {}x{})",
                width, height, t.min_width, t.min_height
            ));
            return inspection;
        }

        let ratio = aspect_ratio(width, height);
        if ratio < t.min_aspect_ratio {
            inspection.verdict = Verdict::fail(format!(
                "too portrait: aspect ratio {:.2} (minimum {:.2})",
                ratio, t.min_aspect_ratio
            ));
            return inspection;
        }

        inspection.verdict = Verdict::pass(format!(
            "{}x{}, {}",
            width,
            height,
            format_bytes_approx(size)
        ));
        inspection
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
