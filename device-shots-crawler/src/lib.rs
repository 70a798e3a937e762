//! Web image search and download for the Bing and Baidu engines.
//!
//! [`WebCrawler`] implements [`device_shots_core::ImageCrawler`]: it pages
//! through an engine's results for one query, then downloads up to the
//! requested number of images into the destination directory with a small
//! pool of worker threads.

pub mod baidu;
pub mod bing;
pub mod client;
pub mod crawler;
pub mod download;
pub mod error;
pub mod filters;

pub use client::{HttpClient, Response};
pub use crawler::{CrawlerConfig, WebCrawler};
pub use error::SearchError;
