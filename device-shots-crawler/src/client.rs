use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::SearchError;

/// Desktop browser UA; both engines serve reduced or empty pages otherwise.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Minimum spacing between search page requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// A fetched body and its declared content type.
#[derive(Debug, Clone)]
pub struct Response {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Blocking HTTP client shared by the search and download stages.
///
/// Search requests are rate limited; image downloads go to many different
/// hosts and are not.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    last_request: Mutex<Instant>,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            last_request: Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL),
        })
    }

    /// Fetch a search results page as text.
    pub fn search_page(
        &self,
        url: &str,
        params: &[(&str, String)],
        referer: &str,
    ) -> Result<String, SearchError> {
        self.rate_limit();
        let resp = self
            .http
            .get(url)
            .query(params)
            .header(reqwest::header::REFERER, referer)
            .send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimit(url.to_string()));
        }
        if !status.is_success() {
            return Err(SearchError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text()?)
    }

    /// Download one file.
    pub fn download(&self, url: &str) -> Result<Response, SearchError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = resp.bytes()?.to_vec();
        Ok(Response { content_type, body })
    }

    /// Wait until at least MIN_REQUEST_INTERVAL has passed since the last
    /// search request.
    fn rate_limit(&self) {
        let mut last = match self.last_request.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            std::thread::sleep(MIN_REQUEST_INTERVAL - elapsed);
        }
        *last = Instant::now();
    }
}
