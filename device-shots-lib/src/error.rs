use thiserror::Error;

use device_shots_core::CatalogError;

/// Errors that can occur while fetching and selecting device images.
#[derive(Debug, Error)]
pub enum ShotError {
    /// I/O error in the working tree or output directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode failure
    #[error("Image codec error: {0}")]
    Codec(String),

    /// Settings file could not be read or parsed
    #[error("Settings error: {0}")]
    Settings(String),

    /// Device catalog is invalid
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Device processing panicked; the payload message is kept
    #[error("Panicked: {0}")]
    Panicked(String),
}

impl ShotError {
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

#[cfg(feature = "codec")]
impl From<image::ImageError> for ShotError {
    fn from(e: image::ImageError) -> Self {
        Self::Codec(e.to_string())
    }
}

/// Best-effort message from a `catch_unwind` payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
