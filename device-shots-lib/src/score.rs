//! Candidate scoring.

use crate::validate::Candidate;

/// Assigns a comparable quality score to a validated candidate.
///
/// Higher is better. The save step only relies on this ordering, so any
/// scorer can be swapped in without touching the rest of the pipeline.
pub trait Scorer {
    fn score(&self, candidate: &Candidate) -> u64;
}

/// Scores by raw file size: larger files are assumed to carry more detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSizeScorer;

impl Scorer for FileSizeScorer {
    fn score(&self, candidate: &Candidate) -> u64 {
        candidate.size
    }
}

/// Index of the highest-scoring candidate; ties go to the earliest one.
///
/// `Iterator::max_by_key` keeps the *last* maximum, so the scan is explicit.
pub fn best_index(candidates: &[Candidate], scorer: &dyn Scorer) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = scorer.score(candidate);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}
