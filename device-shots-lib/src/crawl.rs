//! Crawl adapter: one query term into one directory, never failing.

use std::panic::{self, AssertUnwindSafe};

use device_shots_core::{CrawlError, CrawlRequest, ImageCrawler};

use crate::error::panic_message;

/// What happened to a single crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The crawler returned normally, reporting this many files written
    Completed(usize),
    /// The crawler failed; its files (if any) are still inspected
    Failed(String),
}

impl CrawlOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Run one crawl, containing every failure.
///
/// Ensures the destination directory exists, then invokes the crawler. Both
/// `Err` returns and panics are logged and turned into
/// [`CrawlOutcome::Failed`]; nothing propagates, so one bad query never
/// aborts a device or the run.
pub fn crawl(crawler: &dyn ImageCrawler, request: &CrawlRequest<'_>) -> CrawlOutcome {
    let result = std::fs::create_dir_all(request.dest)
        .map_err(CrawlError::from)
        .and_then(|_| {
            panic::catch_unwind(AssertUnwindSafe(|| crawler.crawl(request)))
                .unwrap_or_else(|payload| Err(CrawlError::Panicked(panic_message(&*payload))))
        });

    match result {
        Ok(count) => {
            log::debug!(
                "{} \"{}\": {} file(s) -> {}",
                request.engine,
                request.query,
                count,
                request.dest.display()
            );
            CrawlOutcome::Completed(count)
        }
        Err(e) => {
            log::warn!("{} query \"{}\" failed: {}", request.engine, request.query, e);
            CrawlOutcome::Failed(e.to_string())
        }
    }
}
