/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Width divided by height. Zero height yields 0.0 so it never passes a
/// minimum-ratio check.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        0.0
    } else {
        width as f64 / height as f64
    }
}

/// Parse the numeric stem of a crawler-written file (`000042.jpg` -> 42).
pub fn file_index(file_name: &str) -> Option<u64> {
    let stem = file_name.split('.').next()?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}
