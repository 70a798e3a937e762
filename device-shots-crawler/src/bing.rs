//! Bing image search.
//!
//! The `images/async` endpoint returns an HTML fragment in which every
//! result tile carries an `m="{...}"` attribute: HTML-escaped JSON whose
//! `murl` field is the full-size image URL.

use crate::client::HttpClient;
use crate::error::SearchError;

const SEARCH_URL: &str = "https://www.bing.com/images/async";
const REFERER: &str = "https://www.bing.com/images";

/// Results requested per page.
pub const PAGE_SIZE: usize = 35;

/// Query parameters for one results page.
pub fn page_params(query: &str, offset: usize, qft: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_string()),
        ("first", offset.to_string()),
        ("count", PAGE_SIZE.to_string()),
        ("mmasync", "1".to_string()),
    ];
    if let Some(qft) = qft {
        params.push(("qft", qft.to_string()));
    }
    params
}

/// Fetch one page of image URLs.
pub fn search_page(
    client: &HttpClient,
    query: &str,
    offset: usize,
    qft: Option<&str>,
) -> Result<Vec<String>, SearchError> {
    let html = client.search_page(SEARCH_URL, &page_params(query, offset, qft), REFERER)?;
    Ok(parse_results(&html))
}

/// Extract image URLs from a results fragment, in page order.
///
/// Tiles whose metadata does not parse are skipped.
pub fn parse_results(html: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find(" m=\"") {
        rest = &rest[start + 4..];
        let Some(end) = rest.find('"') else {
            break;
        };
        let raw = &rest[..end];
        rest = &rest[end + 1..];

        let json = unescape_html(raw);
        match serde_json::from_str::<serde_json::Value>(&json) {
            Ok(meta) => {
                if let Some(url) = meta.get("murl").and_then(|v| v.as_str()) {
                    if url.starts_with("http") {
                        urls.push(url.to_string());
                    }
                }
            }
            Err(e) => log::debug!("Skipping Bing tile with bad metadata: {}", e),
        }
    }
    urls
}

/// Undo the HTML entity escaping used inside attribute values.
fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
