//! Parallel download of search results into a tier directory.

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use device_shots_core::util::file_index;

use crate::client::{HttpClient, Response};
use crate::error::SearchError;

/// Something that can fetch a URL. Lets the worker pool run without network
/// in tests.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Result<Response, SearchError>;
}

impl Fetch for HttpClient {
    fn fetch(&self, url: &str) -> Result<Response, SearchError> {
        self.download(url)
    }
}

/// File extension for an image content type, `None` for anything else.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" | "image/x-ms-bmp" => Some("bmp"),
        _ => None,
    }
}

/// File extension from the URL path, if it names a known image type.
pub fn extension_from_url(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    let (_, ext) = last.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "bmp" => Some("bmp"),
        _ => None,
    }
}

/// Decide the extension for a response, or `None` if it is not an image.
///
/// A declared non-image content type (an HTML error page, say) always
/// loses; the URL is only consulted when the type is missing or generic.
fn extension_for(url: &str, response: &Response) -> Option<&'static str> {
    match response.content_type.as_deref() {
        Some(ct) if ct.trim_start().to_ascii_lowercase().starts_with("image/") => {
            extension_for_content_type(ct).or_else(|| extension_from_url(url))
        }
        Some(ct) if is_generic(ct) => extension_from_url(url),
        None => extension_from_url(url),
        Some(_) => None,
    }
}

fn is_generic(content_type: &str) -> bool {
    let ct = content_type.trim_start().to_ascii_lowercase();
    ct.starts_with("application/octet-stream") || ct.starts_with("binary/octet-stream")
}

/// Highest numeric index among files already in `dir` (0 when none).
pub fn highest_index(dir: &Path) -> Result<u64, SearchError> {
    let mut highest = 0;
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        if let Some(index) = file_index(&entry.file_name().to_string_lossy()) {
            highest = highest.max(index);
        }
    }
    Ok(highest)
}

/// Download `urls` into `dest` until `max_count` images have been stored.
///
/// Files are named `NNNNNN.<ext>`, numbered after the highest index already
/// present. Each file is written under a hidden `.part` name and renamed
/// once complete. Individual download failures are logged and skipped.
/// Returns the number of files stored.
pub fn download_all(
    fetcher: &dyn Fetch,
    urls: &[String],
    dest: &Path,
    max_count: usize,
    threads: usize,
) -> Result<usize, SearchError> {
    if urls.is_empty() || max_count == 0 {
        return Ok(0);
    }
    std::fs::create_dir_all(dest)?;

    let next_url = AtomicUsize::new(0);
    let stored = AtomicUsize::new(0);
    let next_index = AtomicU64::new(highest_index(dest)? + 1);
    let workers = threads.clamp(1, urls.len());

    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                loop {
                    if stored.load(Ordering::SeqCst) >= max_count {
                        break;
                    }
                    let i = next_url.fetch_add(1, Ordering::SeqCst);
                    let Some(url) = urls.get(i) else {
                        break;
                    };
                    let response = match fetcher.fetch(url) {
                        Ok(r) => r,
                        Err(e) => {
                            log::debug!("Download failed for {}: {}", url, e);
                            continue;
                        }
                    };
                    let Some(ext) = extension_for(url, &response) else {
                        log::debug!(
                            "Skipping non-image response from {} ({})",
                            url,
                            response.content_type.as_deref().unwrap_or("no content type")
                        );
                        continue;
                    };
                    if response.body.is_empty() {
                        continue;
                    }
                    // Claim a slot only once there is something to store
                    let claimed = stored
                        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                            (n < max_count).then_some(n + 1)
                        })
                        .is_ok();
                    if !claimed {
                        break;
                    }
                    let index = next_index.fetch_add(1, Ordering::SeqCst);
                    if let Err(e) = store(dest, index, ext, &response.body) {
                        log::warn!("Could not write image from {}: {}", url, e);
                        stored.fetch_sub(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    Ok(stored.load(Ordering::SeqCst))
}

fn store(dest: &Path, index: u64, ext: &str, body: &[u8]) -> std::io::Result<()> {
    let name = format!("{:06}.{}", index, ext);
    let part = dest.join(format!(".{}.part", name));
    std::fs::write(&part, body)?;
    std::fs::rename(&part, dest.join(name))
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
