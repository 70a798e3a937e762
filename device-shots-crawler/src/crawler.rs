use std::collections::HashSet;
use std::time::Duration;

use device_shots_core::{CrawlError, CrawlRequest, Engine, ImageCrawler};

use crate::client::HttpClient;
use crate::download;
use crate::error::SearchError;
use crate::{baidu, bing, filters};

/// Never page past this many result pages for one query.
const MAX_PAGES: usize = 3;

/// Collect this many URLs per requested image; plenty of links are dead,
/// hotlink-protected or not images at all.
const OVERSAMPLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Downloader threads per query
    pub download_threads: usize,
    pub timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            download_threads: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Image crawler for the public Bing and Baidu image search endpoints.
pub struct WebCrawler {
    client: HttpClient,
    config: CrawlerConfig,
}

impl WebCrawler {
    pub fn new(config: CrawlerConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: HttpClient::new(config.timeout)?,
            config,
        })
    }

    /// Result URLs for a query, deduplicated, in engine rank order.
    pub fn search(&self, request: &CrawlRequest<'_>) -> Result<Vec<String>, SearchError> {
        let wanted = request.max_count.saturating_mul(OVERSAMPLE);
        let qft = match request.engine {
            Engine::Bing => filters::bing_qft(request.filters),
            Engine::Baidu => None,
        };

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for page in 0..MAX_PAGES {
            let found = match request.engine {
                Engine::Bing => bing::search_page(
                    &self.client,
                    request.query,
                    page * bing::PAGE_SIZE,
                    qft.as_deref(),
                )?,
                Engine::Baidu => {
                    baidu::search_page(&self.client, request.query, page * baidu::PAGE_SIZE)?
                }
            };
            if found.is_empty() {
                break;
            }
            for url in found {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
            if urls.len() >= wanted {
                break;
            }
        }

        log::debug!(
            "{} \"{}\": {} result URL(s)",
            request.engine.display_name(),
            request.query,
            urls.len()
        );
        Ok(urls)
    }
}

impl ImageCrawler for WebCrawler {
    fn crawl(&self, request: &CrawlRequest<'_>) -> Result<usize, CrawlError> {
        if request.max_count == 0 {
            return Ok(0);
        }
        let urls = self.search(request)?;
        let stored = download::download_all(
            &self.client,
            &urls,
            request.dest,
            request.max_count,
            self.config.download_threads,
        )?;
        Ok(stored)
    }
}
