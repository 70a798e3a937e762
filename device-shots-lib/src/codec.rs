//! Image codec capability.
//!
//! The codec is resolved once at start-up into an `Option<Box<dyn ImageCodec>>`.
//! The validator and the save step branch on its presence: with a codec they
//! check pixel dimensions and normalize formats, without one they fall back
//! to size-only checks and byte-for-byte copies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ShotError;

/// Canonical output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension used for saved images.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

/// Pixel-level image operations.
pub trait ImageCodec {
    /// Decode the file and return its `(width, height)`.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ShotError>;

    /// Whether the file content (not its extension) is already `format`.
    fn is_format(&self, path: &Path, format: OutputFormat) -> Result<bool, ShotError>;

    /// Decode `src` and write it to `dst` as `format`.
    ///
    /// `quality` applies to lossy formats only.
    fn reencode(
        &self,
        src: &Path,
        dst: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), ShotError>;
}

/// Resolve the codec for this run.
///
/// Returns `None` when disabled by the caller or when the crate was built
/// without the `codec` feature.
pub fn resolve_codec(enabled: bool) -> Option<Box<dyn ImageCodec>> {
    if !enabled {
        return None;
    }
    #[cfg(feature = "codec")]
    {
        Some(Box::new(RasterCodec))
    }
    #[cfg(not(feature = "codec"))]
    {
        log::debug!("Built without the codec feature; image checks are size-only");
        None
    }
}

/// Codec backed by the `image` crate.
///
/// Formats are detected from file content, since crawled files often carry
/// the wrong extension.
#[cfg(feature = "codec")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

#[cfg(feature = "codec")]
impl RasterCodec {
    fn open(path: &Path) -> Result<image::ImageReader<std::io::BufReader<std::fs::File>>, ShotError> {
        Ok(image::ImageReader::open(path)?.with_guessed_format()?)
    }
}

#[cfg(feature = "codec")]
impl ImageCodec for RasterCodec {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ShotError> {
        // Full decode: a header-only probe would accept truncated downloads
        let img = Self::open(path)?.decode()?;
        Ok((img.width(), img.height()))
    }

    fn is_format(&self, path: &Path, format: OutputFormat) -> Result<bool, ShotError> {
        let detected = Self::open(path)?.format();
        Ok(match format {
            OutputFormat::Jpeg => detected == Some(image::ImageFormat::Jpeg),
            OutputFormat::Png => detected == Some(image::ImageFormat::Png),
        })
    }

    fn reencode(
        &self,
        src: &Path,
        dst: &Path,
        format: OutputFormat,
        quality: u8,
    ) -> Result<(), ShotError> {
        use std::io::Write;

        let img = Self::open(src)?.decode()?;
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = std::io::BufWriter::new(std::fs::File::create(dst)?);
        match format {
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
                rgb.write_with_encoder(encoder)?;
            }
            OutputFormat::Png => {
                let encoder = image::codecs::png::PngEncoder::new(&mut writer);
                img.write_with_encoder(encoder)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(all(test, feature = "codec"))]
#[path = "tests/codec_tests.rs"]
mod tests;
