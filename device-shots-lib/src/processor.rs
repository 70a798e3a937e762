//! Tiered search for a single device.
//!
//! Primary query terms are tried best-first until enough valid candidates
//! are collected; only then (or when the primary list runs out) does the
//! secondary engine get a turn. Two boundary rules are intentional and must
//! stay as they are:
//!
//! - the "already satisfied" check for primary tiers starts at the second
//!   tier, so the first primary query always runs, even with a minimum of 0;
//! - the secondary list stops on *any* candidate, not on the configured
//!   minimum.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use device_shots_core::{CrawlRequest, DeviceSpec, Engine, ImageCrawler};

use crate::ShotError;
use crate::codec::ImageCodec;
use crate::crawl::{self, CrawlOutcome};
use crate::progress::ShotEvent;
use crate::save::{SavedImage, Saver};
use crate::score::Scorer;
use crate::settings::Settings;
use crate::validate::{Candidate, Validator};

/// Which query list a tier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierList {
    Primary,
    Secondary,
}

/// One planned crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPlan {
    pub list: TierList,
    pub engine: Engine,
    pub tier: usize,
    pub query: String,
    pub dir: PathBuf,
    pub max_count: usize,
}

/// One executed crawl and what came of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAttempt {
    pub list: TierList,
    pub engine: Engine,
    pub tier: usize,
    pub query: String,
    pub crawl: CrawlOutcome,
    /// Files that appeared in the tier directory during this crawl
    pub new_files: usize,
    /// Of those, files that passed validation
    pub accepted: usize,
}

/// Result of processing one device.
#[derive(Debug, Clone)]
pub struct DeviceOutcome {
    pub slug: String,
    pub attempts: Vec<TierAttempt>,
    /// Valid candidates in accumulation order
    pub candidates: Vec<Candidate>,
    /// `None` when no candidate was found
    pub saved: Option<SavedImage>,
}

/// Drives the tier state machine, the validator and the save step for one
/// device at a time.
pub struct DeviceProcessor<'a> {
    settings: &'a Settings,
    crawler: &'a dyn ImageCrawler,
    validator: Validator<'a>,
    saver: Saver<'a>,
}

impl<'a> DeviceProcessor<'a> {
    pub fn new(
        settings: &'a Settings,
        crawler: &'a dyn ImageCrawler,
        scorer: &'a dyn Scorer,
        codec: Option<&'a dyn ImageCodec>,
    ) -> Self {
        Self {
            settings,
            crawler,
            validator: Validator::new(&settings.validation, codec),
            saver: Saver::new(
                &settings.paths.output_dir,
                settings.output.format,
                settings.output.quality,
                scorer,
                codec,
            ),
        }
    }

    pub fn saver(&self) -> &Saver<'a> {
        &self.saver
    }

    /// Working directory for one tier: `<raw_root>/<slug>/<engine>_<tier>`.
    pub fn tier_dir(&self, slug: &str, engine: Engine, tier: usize) -> PathBuf {
        self.settings
            .paths
            .raw_root
            .join(slug)
            .join(format!("{}_{}", engine.short_name(), tier))
    }

    /// Every crawl the device could need, in the order it would happen.
    pub fn plan(&self, device: &DeviceSpec) -> Vec<TierPlan> {
        let search = &self.settings.search;
        let primary = device.primary.iter().enumerate().map(|(tier, query)| TierPlan {
            list: TierList::Primary,
            engine: search.primary_engine,
            tier,
            query: query.clone(),
            dir: self.tier_dir(&device.slug, search.primary_engine, tier),
            max_count: search.primary_max_per_query,
        });
        let secondary = device.secondary.iter().enumerate().map(|(tier, query)| TierPlan {
            list: TierList::Secondary,
            engine: search.secondary_engine,
            tier,
            query: query.clone(),
            dir: self.tier_dir(&device.slug, search.secondary_engine, tier),
            max_count: search.secondary_max_per_query,
        });
        primary.chain(secondary).collect()
    }

    /// Run the tiered search for one device and save the winner.
    ///
    /// Crawler failures are contained per tier. Errors returned here are
    /// unexpected (filesystem trouble in the working tree or output
    /// directory) and belong to this device only.
    pub fn process(
        &self,
        device: &DeviceSpec,
        on_event: &mut dyn FnMut(&ShotEvent),
    ) -> Result<DeviceOutcome, ShotError> {
        let min_candidates = self.settings.selection.min_candidates;
        let mut outcome = DeviceOutcome {
            slug: device.slug.clone(),
            attempts: Vec::new(),
            candidates: Vec::new(),
            saved: None,
        };

        let (primary, secondary): (Vec<_>, Vec<_>) = self
            .plan(device)
            .into_iter()
            .partition(|p| p.list == TierList::Primary);

        for plan in &primary {
            if plan.tier > 0 && outcome.candidates.len() >= min_candidates {
                log::debug!(
                    "{}: {} candidate(s) after {} tier(s), skipping remaining primary queries",
                    device.slug,
                    outcome.candidates.len(),
                    plan.tier
                );
                break;
            }
            self.run_tier(&device.slug, plan, &mut outcome, on_event)?;
        }

        if outcome.candidates.len() < min_candidates {
            for plan in &secondary {
                if !outcome.candidates.is_empty() {
                    break;
                }
                self.run_tier(&device.slug, plan, &mut outcome, on_event)?;
            }
        }

        outcome.saved = self.saver.save(&outcome.candidates, &device.slug)?;
        match &outcome.saved {
            Some(saved) => on_event(&ShotEvent::Saved {
                slug: device.slug.clone(),
                path: saved.path.clone(),
                converted: saved.converted,
            }),
            None => on_event(&ShotEvent::NoImage {
                slug: device.slug.clone(),
            }),
        }
        Ok(outcome)
    }

    /// Crawl one tier, then validate whatever appeared in its directory.
    fn run_tier(
        &self,
        slug: &str,
        plan: &TierPlan,
        outcome: &mut DeviceOutcome,
        on_event: &mut dyn FnMut(&ShotEvent),
    ) -> Result<(), ShotError> {
        on_event(&ShotEvent::TierStarted {
            slug: slug.to_string(),
            engine: plan.engine,
            tier: plan.tier,
            query: plan.query.clone(),
        });

        let before = list_files(&plan.dir)?;
        let request = CrawlRequest {
            engine: plan.engine,
            query: &plan.query,
            dest: &plan.dir,
            max_count: plan.max_count,
            filters: &self.settings.search.filters,
        };
        let crawl_outcome = crawl::crawl(self.crawler, &request);
        if let CrawlOutcome::Failed(message) = &crawl_outcome {
            on_event(&ShotEvent::CrawlFailed {
                slug: slug.to_string(),
                engine: plan.engine,
                tier: plan.tier,
                message: message.clone(),
            });
        }

        let after = list_files(&plan.dir)?;
        let new_files: Vec<&PathBuf> = after.difference(&before).collect();
        let mut accepted = 0;
        for path in &new_files {
            let inspection = self.validator.inspect(path);
            if inspection.verdict.valid {
                log::debug!("  accepted {}: {}", path.display(), inspection.verdict.reason);
            } else {
                log::debug!("  rejected {}: {}", path.display(), inspection.verdict.reason);
                on_event(&ShotEvent::Rejected {
                    path: path.to_path_buf(),
                    reason: inspection.verdict.reason.clone(),
                });
            }
            if let Some(candidate) = inspection.into_candidate() {
                outcome.candidates.push(candidate);
                accepted += 1;
            }
        }

        on_event(&ShotEvent::TierFinished {
            slug: slug.to_string(),
            engine: plan.engine,
            tier: plan.tier,
            new_files: new_files.len(),
            accepted,
        });
        outcome.attempts.push(TierAttempt {
            list: plan.list,
            engine: plan.engine,
            tier: plan.tier,
            query: plan.query.clone(),
            crawl: crawl_outcome,
            new_files: new_files.len(),
            accepted,
        });
        Ok(())
    }
}

/// Regular files directly inside `dir`, sorted. A missing directory is empty.
///
/// Hidden files (partial downloads) are skipped.
fn list_files(dir: &Path) -> Result<BTreeSet<PathBuf>, ShotError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(e.into()),
    };
    let mut files = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_file() {
            files.insert(entry.path());
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "tests/processor_tests.rs"]
mod tests;
