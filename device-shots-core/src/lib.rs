//! Shared domain types for device-shots: device specs, search engines and
//! the crawler contract. No I/O happens in this crate.

pub mod crawl;
pub mod device;
pub mod engine;
pub mod error;
pub mod util;

pub use crawl::{CrawlRequest, ImageCrawler, LicenseFilter, SearchFilters, SizeFilter};
pub use device::{DeviceCatalog, DeviceSpec, is_valid_slug};
pub use engine::{Engine, EngineParseError};
pub use error::{CatalogError, CrawlError};
