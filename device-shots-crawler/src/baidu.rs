//! Baidu image search through the `acjson` JSON endpoint.

use serde::Deserialize;

use crate::client::HttpClient;
use crate::error::SearchError;

const SEARCH_URL: &str = "https://image.baidu.com/search/acjson";
const REFERER: &str = "https://image.baidu.com/";

/// Results requested per page.
pub const PAGE_SIZE: usize = 30;

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Item {
    #[serde(rename = "replaceUrl")]
    replace_url: Vec<ReplaceUrl>,
    #[serde(rename = "middleURL")]
    middle_url: Option<String>,
    #[serde(rename = "thumbURL")]
    thumb_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplaceUrl {
    #[serde(rename = "ObjURL")]
    obj_url: Option<String>,
}

impl Item {
    /// Best available URL: original, then medium, then thumbnail.
    fn best_url(self) -> Option<String> {
        self.replace_url
            .into_iter()
            .find_map(|r| r.obj_url)
            .or(self.middle_url)
            .or(self.thumb_url)
            .filter(|u| u.starts_with("http"))
    }
}

pub fn page_params(query: &str, offset: usize) -> Vec<(&'static str, String)> {
    vec![
        ("tn", "resultjson_com".to_string()),
        ("ipn", "rj".to_string()),
        ("word", query.to_string()),
        ("queryWord", query.to_string()),
        ("pn", offset.to_string()),
        ("rn", PAGE_SIZE.to_string()),
        ("ie", "utf-8".to_string()),
        ("oe", "utf-8".to_string()),
    ]
}

/// Fetch one page of image URLs.
pub fn search_page(
    client: &HttpClient,
    query: &str,
    offset: usize,
) -> Result<Vec<String>, SearchError> {
    let body = client.search_page(SEARCH_URL, &page_params(query, offset), REFERER)?;
    parse_results(&body)
}

/// Extract image URLs from a results page, in page order.
///
/// Baidu pads `data` with an empty trailing object and escapes single
/// quotes as `\'`, which is not valid JSON.
pub fn parse_results(body: &str) -> Result<Vec<String>, SearchError> {
    let cleaned = body.replace("\\'", "'");
    let page: Page = serde_json::from_str(&cleaned)
        .map_err(|e| SearchError::parse(format!("Baidu response: {e}")))?;
    Ok(page.data.into_iter().filter_map(Item::best_url).collect())
}
