//! The contract between the tiered search policy and an image crawler.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Engine;
use crate::error::CrawlError;

/// Minimum image size hint passed to engines that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeFilter {
    Small,
    Medium,
    Large,
    Wallpaper,
}

/// License hint passed to engines that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseFilter {
    /// Any Creative Commons license
    CreativeCommons,
    /// Public domain only
    PublicDomain,
}

/// Search-side filter criteria.
///
/// These are hints: an engine that has no equivalent ignores them, and
/// nothing guarantees the results actually satisfy them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub size: Option<SizeFilter>,
    pub photo_only: bool,
    pub license: Option<LicenseFilter>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            size: Some(SizeFilter::Large),
            photo_only: true,
            license: Some(LicenseFilter::CreativeCommons),
        }
    }
}

impl SearchFilters {
    /// No filtering at all.
    pub fn none() -> Self {
        Self {
            size: None,
            photo_only: false,
            license: None,
        }
    }
}

/// One crawl: a single query term into a single directory.
#[derive(Debug, Clone, Copy)]
pub struct CrawlRequest<'a> {
    pub engine: Engine,
    pub query: &'a str,
    pub dest: &'a Path,
    pub max_count: usize,
    pub filters: &'a SearchFilters,
}

/// An external image crawler.
///
/// Best-effort: given a query and a cap, populate `request.dest` with zero
/// or more downloaded image files. Neither the exact count nor the filter
/// criteria are guaranteed. Returns the number of files written.
pub trait ImageCrawler {
    fn crawl(&self, request: &CrawlRequest<'_>) -> Result<usize, CrawlError>;
}

impl<T: ImageCrawler + ?Sized> ImageCrawler for &T {
    fn crawl(&self, request: &CrawlRequest<'_>) -> Result<usize, CrawlError> {
        (**self).crawl(request)
    }
}

impl<T: ImageCrawler + ?Sized> ImageCrawler for Box<T> {
    fn crawl(&self, request: &CrawlRequest<'_>) -> Result<usize, CrawlError> {
        (**self).crawl(request)
    }
}
