//! Tiered image search policy for device product shots.
//!
//! For each device in a catalog, query terms are crawled best-first into a
//! raw download tree, every new file is validated, and the best candidate is
//! saved as `<output_dir>/<slug>.<ext>`. Crawling itself sits behind the
//! [`ImageCrawler`](device_shots_core::ImageCrawler) trait.

pub mod catalog;
pub mod codec;
pub mod crawl;
pub mod driver;
pub mod error;
pub mod processor;
pub mod progress;
pub mod report;
pub mod save;
pub mod score;
pub mod settings;
pub mod validate;

pub use codec::{ImageCodec, OutputFormat, resolve_codec};
pub use crawl::CrawlOutcome;
pub use driver::run_devices;
pub use error::ShotError;
pub use processor::{DeviceOutcome, DeviceProcessor, TierAttempt, TierList, TierPlan};
pub use progress::ShotEvent;
pub use report::{DeviceStatus, ReportEntry, ReportSummary, RunReport};
pub use save::{SavedImage, Saver};
pub use score::{FileSizeScorer, Scorer};
pub use settings::{RunConfig, Settings, settings_path};
pub use validate::{Candidate, Inspection, Thresholds, Validator, Verdict};

#[cfg(feature = "codec")]
pub use codec::RasterCodec;

#[cfg(test)]
pub(crate) mod test_support;
