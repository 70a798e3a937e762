use std::path::{Path, PathBuf};

use crate::processor::DeviceOutcome;

/// How one device ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Saved { path: PathBuf, converted: bool },
    /// All tiers ran without producing a valid candidate
    NoImage,
    /// Processing failed; the run moved on
    Failed { message: String },
}

/// A single device's line in the run report.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub slug: String,
    pub status: DeviceStatus,
    /// Tiers crawled, as `<engine>_<tier>`
    pub tiers: Vec<String>,
    pub crawl_failures: usize,
    pub candidates: usize,
}

impl ReportEntry {
    pub fn from_outcome(outcome: &DeviceOutcome) -> Self {
        let status = match &outcome.saved {
            Some(saved) => DeviceStatus::Saved {
                path: saved.path.clone(),
                converted: saved.converted,
            },
            None => DeviceStatus::NoImage,
        };
        Self {
            slug: outcome.slug.clone(),
            status,
            tiers: outcome
                .attempts
                .iter()
                .map(|a| format!("{}_{}", a.engine, a.tier))
                .collect(),
            crawl_failures: outcome.attempts.iter().filter(|a| a.crawl.is_failed()).count(),
            candidates: outcome.candidates.len(),
        }
    }

    pub fn failed(slug: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            status: DeviceStatus::Failed {
                message: message.into(),
            },
            tiers: Vec::new(),
            crawl_failures: 0,
            candidates: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub saved: usize,
    pub converted: usize,
    pub no_image: usize,
    pub failed: usize,
    /// Slugs without an output image, in catalog order
    pub missing: Vec<String>,
}

/// Collects per-device results and writes a log file.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match &entry.status {
                DeviceStatus::Saved { converted, .. } => {
                    summary.saved += 1;
                    if *converted {
                        summary.converted += 1;
                    }
                }
                DeviceStatus::NoImage => {
                    summary.no_image += 1;
                    summary.missing.push(entry.slug.clone());
                }
                DeviceStatus::Failed { .. } => {
                    summary.failed += 1;
                    summary.missing.push(entry.slug.clone());
                }
            }
        }
        summary
    }

    /// Write the report to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let summary = self.summary();

        writeln!(file, "=== Device Shots Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Saved: {}/{} (converted: {})",
            summary.saved, summary.total, summary.converted
        )?;
        writeln!(file, "No image: {}", summary.no_image)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        if !summary.missing.is_empty() {
            writeln!(file, "Missing: {}", summary.missing.join(", "))?;
        }
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match &entry.status {
                DeviceStatus::Saved { path, converted } => {
                    writeln!(
                        file,
                        "[OK] {} -> {}{}",
                        entry.slug,
                        path.display(),
                        if *converted { " (converted)" } else { "" }
                    )?;
                }
                DeviceStatus::NoImage => writeln!(file, "[MISSING] {}", entry.slug)?,
                DeviceStatus::Failed { message } => {
                    writeln!(file, "[ERROR] {}: {}", entry.slug, message)?
                }
            }
            if !entry.tiers.is_empty() {
                writeln!(
                    file,
                    "     Tiers: {} ({} candidate(s), {} crawl failure(s))",
                    entry.tiers.join(", "),
                    entry.candidates,
                    entry.crawl_failures
                )?;
            }
        }

        file.flush()
    }
}
