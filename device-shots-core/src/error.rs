use thiserror::Error;

/// Errors raised while building a device catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Slug is empty or contains characters outside `[a-z0-9_-]`
    #[error("Invalid device slug '{0}': use lowercase letters, digits, '_' or '-'")]
    InvalidSlug(String),

    /// Two devices share a slug
    #[error("Duplicate device slug '{0}'")]
    DuplicateSlug(String),

    /// A device has no usable primary query
    #[error("Device '{0}' has no primary search queries")]
    NoPrimaryQueries(String),

    /// A slug filter named a device that is not in the catalog
    #[error("Unknown device slug '{0}'")]
    UnknownSlug(String),
}

impl CatalogError {
    pub fn invalid_slug(slug: impl Into<String>) -> Self {
        Self::InvalidSlug(slug.into())
    }
}

/// Errors an image crawler may report for one query.
///
/// Callers treat every variant as recoverable: the query is skipped and the
/// next tier is tried.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The search request or result page could not be fetched or parsed
    #[error("Search failed: {0}")]
    Search(String),

    /// Writing downloaded files failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The crawler panicked; the payload message is kept
    #[error("Crawler panicked: {0}")]
    Panicked(String),
}

impl CrawlError {
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }
}
