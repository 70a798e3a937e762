use device_shots_core::CrawlError;

/// Errors that can occur while searching or downloading.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {0}")]
    RateLimit(String),

    #[error("Server error (HTTP {status}) from {url}")]
    ServerError { status: u16, url: String },

    #[error("Could not parse search results: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<SearchError> for CrawlError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Io(io) => CrawlError::Io(io),
            other => CrawlError::search(other.to_string()),
        }
    }
}
