//! Materializing the winning candidate as `<output_dir>/<slug>.<ext>`.

use std::path::{Path, PathBuf};

use crate::ShotError;
use crate::codec::{ImageCodec, OutputFormat};
use crate::score::{Scorer, best_index};
use crate::validate::Candidate;

/// The image written for a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Final output path
    pub path: PathBuf,
    /// Candidate it was produced from
    pub source: PathBuf,
    pub score: u64,
    /// Whether the file was re-encoded (false: copied byte-for-byte)
    pub converted: bool,
}

/// Selects the best candidate and writes it in the canonical format.
pub struct Saver<'a> {
    output_dir: &'a Path,
    format: OutputFormat,
    quality: u8,
    scorer: &'a dyn Scorer,
    codec: Option<&'a dyn ImageCodec>,
}

impl<'a> Saver<'a> {
    pub fn new(
        output_dir: &'a Path,
        format: OutputFormat,
        quality: u8,
        scorer: &'a dyn Scorer,
        codec: Option<&'a dyn ImageCodec>,
    ) -> Self {
        Self {
            output_dir,
            format,
            quality,
            scorer,
            codec,
        }
    }

    /// Deterministic output path for a slug.
    pub fn output_path(&self, slug: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", slug, self.format.extension()))
    }

    /// Save the best candidate for `slug`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there are no
    /// candidates. The output is written to a temporary name and renamed into
    /// place, so a slug never has more than one output file and a failed
    /// write leaves the previous image intact.
    pub fn save(&self, candidates: &[Candidate], slug: &str) -> Result<Option<SavedImage>, ShotError> {
        let Some((index, score)) = best_index(candidates, self.scorer) else {
            return Ok(None);
        };
        let winner = &candidates[index];

        std::fs::create_dir_all(self.output_dir)?;
        let dest = self.output_path(slug);
        let tmp = self
            .output_dir
            .join(format!(".{}.{}.tmp", slug, self.format.extension()));

        let converted = self.write_winner(&winner.path, &tmp)?;
        std::fs::rename(&tmp, &dest)?;

        log::debug!(
            "Saved {} -> {} ({})",
            winner.path.display(),
            dest.display(),
            if converted { "converted" } else { "copied" }
        );

        Ok(Some(SavedImage {
            path: dest,
            source: winner.path.clone(),
            score,
            converted,
        }))
    }

    /// Write `src` to `tmp`, converting when needed and possible.
    /// Returns whether a conversion happened.
    fn write_winner(&self, src: &Path, tmp: &Path) -> Result<bool, ShotError> {
        if let Some(codec) = self.codec {
            let canonical = codec.is_format(src, self.format).unwrap_or(false);
            if !canonical {
                match codec.reencode(src, tmp, self.format, self.quality) {
                    Ok(()) => return Ok(true),
                    Err(e) => {
                        log::warn!(
                            "Could not convert {} to {}, copying as-is: {}",
                            src.display(),
                            self.format,
                            e
                        );
                        let _ = std::fs::remove_file(tmp);
                    }
                }
            }
        }
        std::fs::copy(src, tmp)?;
        Ok(false)
    }
}

#[cfg(test)]
#[path = "tests/save_tests.rs"]
mod tests;
