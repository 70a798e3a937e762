use std::path::PathBuf;

use device_shots_core::Engine;

/// Progress events emitted while processing devices, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum ShotEvent {
    /// A device has started processing.
    DeviceStarted {
        /// Position in the run (0-based)
        index: usize,
        total: usize,
        slug: String,
    },

    /// A query tier is about to be crawled.
    TierStarted {
        slug: String,
        engine: Engine,
        tier: usize,
        query: String,
    },

    /// The crawler failed for one tier; processing continues.
    CrawlFailed {
        slug: String,
        engine: Engine,
        tier: usize,
        message: String,
    },

    /// A downloaded file was rejected by the validator.
    Rejected { path: PathBuf, reason: String },

    /// A tier finished.
    TierFinished {
        slug: String,
        engine: Engine,
        tier: usize,
        /// Files that appeared in the tier directory
        new_files: usize,
        /// Of those, files that passed validation
        accepted: usize,
    },

    /// The device's image was written.
    Saved {
        slug: String,
        path: PathBuf,
        converted: bool,
    },

    /// Every tier was exhausted without a valid candidate.
    NoImage { slug: String },

    /// Device processing failed with an unexpected error.
    DeviceFailed { slug: String, message: String },
}
