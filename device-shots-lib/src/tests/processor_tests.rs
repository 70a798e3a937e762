use tempfile::TempDir;

use super::*;
use crate::codec::OutputFormat;
use crate::score::FileSizeScorer;
use crate::test_support::{FakeCodec, FakeImage, Script, ScriptedCrawler};

fn settings(root: &Path, min_candidates: usize) -> Settings {
    let mut settings = Settings::default();
    settings.paths.raw_root = root.join("raw");
    settings.paths.output_dir = root.join("out");
    settings.selection.min_candidates = min_candidates;
    settings
}

fn laptop() -> DeviceSpec {
    DeviceSpec::new("test_laptop")
        .with_primary("p0")
        .with_primary("p1")
        .with_primary("p2")
        .with_secondary("s0")
        .with_secondary("s1")
}

fn good(size: usize) -> FakeImage {
    FakeImage::new(1600, 900, size)
}

fn low_res() -> FakeImage {
    FakeImage::new(300, 200, 40_000)
}

struct Run {
    outcome: DeviceOutcome,
    events: Vec<ShotEvent>,
    queries: Vec<String>,
}

fn run(root: &Path, min_candidates: usize, crawler: ScriptedCrawler) -> Run {
    let settings = settings(root, min_candidates);
    let processor = DeviceProcessor::new(&settings, &crawler, &FileSizeScorer, Some(&FakeCodec));
    let mut events = Vec::new();
    let outcome = processor
        .process(&laptop(), &mut |e: &ShotEvent| events.push(e.clone()))
        .unwrap();
    Run {
        outcome,
        events,
        queries: crawler.queries(),
    }
}

// -------------------------------------------------------------------------
// End-to-end tier scenarios
// -------------------------------------------------------------------------

#[test]
fn first_tier_satisfies_minimum() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new().on("p0", Script::Files(vec![good(30_000), good(50_000)]));

    let run = run(tmp.path(), 1, crawler);

    assert_eq!(run.queries, vec!["p0"]);
    assert_eq!(run.outcome.candidates.len(), 2);
    let saved = run.outcome.saved.unwrap();
    assert_eq!(saved.path, tmp.path().join("out").join("test_laptop.jpg"));
    assert_eq!(saved.score, 50_000);
    assert_eq!(saved.source.file_name().unwrap(), "000002.jpg");
}

#[test]
fn second_tier_hit_skips_secondary_engine() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("p0", Script::Files(vec![low_res()]))
        .on("p1", Script::Files(vec![good(60_000).format("webp")]));

    let run = run(tmp.path(), 1, crawler);

    assert_eq!(run.queries, vec!["p0", "p1"]);
    let saved = run.outcome.saved.unwrap();
    assert!(saved.converted);
    assert!(FakeCodec.is_format(&saved.path, OutputFormat::Jpeg).unwrap());
    assert_eq!(FakeCodec.dimensions(&saved.path).unwrap(), (1600, 900));
}

#[test]
fn nothing_valid_anywhere_saves_nothing() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("p0", Script::Files(vec![low_res()]))
        .on("s1", Script::Files(vec![FakeImage::new(800, 1200, 40_000)]));

    let run = run(tmp.path(), 2, crawler);

    assert_eq!(run.queries, vec!["p0", "p1", "p2", "s0", "s1"]);
    assert!(run.outcome.saved.is_none());
    assert!(run.outcome.candidates.is_empty());
    assert!(!tmp.path().join("out").exists());
    assert!(matches!(run.events.last(), Some(ShotEvent::NoImage { slug }) if slug == "test_laptop"));
}

// -------------------------------------------------------------------------
// Stop rules
// -------------------------------------------------------------------------

#[test]
fn first_primary_tier_always_runs() {
    let tmp = TempDir::new().unwrap();
    let run = run(tmp.path(), 0, ScriptedCrawler::new());

    // Satisfied check is skipped for tier 0, then 0 >= 0 stops the rest;
    // 0 < 0 is false, so the secondary list never starts.
    assert_eq!(run.queries, vec!["p0"]);
    assert!(run.outcome.saved.is_none());
}

#[test]
fn primary_tiers_accumulate_until_minimum() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("p0", Script::Files(vec![good(30_000)]))
        .on("p1", Script::Files(vec![good(25_000), low_res()]))
        .on("p2", Script::Files(vec![good(90_000)]));

    let run = run(tmp.path(), 2, crawler);

    assert_eq!(run.queries, vec!["p0", "p1"]);
    assert_eq!(run.outcome.candidates.len(), 2);
    // Winner is chosen across tiers, not per tier
    assert_eq!(run.outcome.saved.unwrap().score, 30_000);
}

#[test]
fn secondary_tiers_stop_on_any_hit() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("s0", Script::Files(vec![good(30_000)]))
        .on("s1", Script::Files(vec![good(90_000)]));

    let run = run(tmp.path(), 3, crawler);

    assert_eq!(run.queries, vec!["p0", "p1", "p2", "s0"]);
    assert_eq!(run.outcome.candidates.len(), 1);
    assert_eq!(run.outcome.saved.unwrap().score, 30_000);
}

#[test]
fn partial_primary_result_never_reaches_secondary() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("p0", Script::Files(vec![good(30_000)]))
        .on("s0", Script::Files(vec![good(90_000)]));

    let run = run(tmp.path(), 2, crawler);

    // One candidate is below the minimum of two, yet the secondary loop
    // bails out at once because it already has a candidate.
    assert_eq!(run.queries, vec!["p0", "p1", "p2"]);
    assert_eq!(run.outcome.saved.unwrap().score, 30_000);
}

// -------------------------------------------------------------------------
// Failure containment
// -------------------------------------------------------------------------

#[test]
fn crawler_failures_do_not_stop_later_tiers() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new()
        .on("p0", Script::Panic)
        .on("p1", Script::FailAfter(vec![good(40_000)]));

    let run = run(tmp.path(), 1, crawler);

    assert_eq!(run.queries, vec!["p0", "p1"]);
    let attempts = &run.outcome.attempts;
    assert_eq!(attempts.len(), 2);
    assert!(matches!(&attempts[0].crawl, CrawlOutcome::Failed(m) if m.contains("crawler exploded on p0")));
    // Files written before the failure still count
    assert!(attempts[1].crawl.is_failed());
    assert_eq!(attempts[1].accepted, 1);
    assert!(run.outcome.saved.is_some());

    let failures = run
        .events
        .iter()
        .filter(|e| matches!(e, ShotEvent::CrawlFailed { .. }))
        .count();
    assert_eq!(failures, 2);
}

// -------------------------------------------------------------------------
// Working tree
// -------------------------------------------------------------------------

#[test]
fn tiers_use_separate_directories_and_caps() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), 5);
    let crawler = ScriptedCrawler::new();
    let processor = DeviceProcessor::new(&settings, &crawler, &FileSizeScorer, None);
    processor.process(&laptop(), &mut |_: &ShotEvent| {}).unwrap();

    let raw = tmp.path().join("raw").join("test_laptop");
    let requests = crawler.requests.borrow();
    let dests: Vec<_> = requests.iter().map(|r| r.dest.clone()).collect();
    assert_eq!(
        dests,
        vec![
            raw.join("bing_0"),
            raw.join("bing_1"),
            raw.join("bing_2"),
            raw.join("baidu_0"),
            raw.join("baidu_1"),
        ]
    );
    assert_eq!(requests[0].engine, Engine::Bing);
    assert_eq!(requests[0].max_count, 3);
    assert_eq!(requests[3].engine, Engine::Baidu);
    assert_eq!(requests[3].max_count, 2);
    assert!(raw.join("baidu_1").is_dir());
}

#[test]
fn files_from_previous_runs_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let stale = tmp.path().join("raw/test_laptop/bing_0/000001.jpg");
    good(500_000).write(&stale);

    let crawler = ScriptedCrawler::new().on("p0", Script::Files(vec![good(30_000)]));
    let run = run(tmp.path(), 1, crawler);

    assert_eq!(run.outcome.candidates.len(), 1);
    let saved = run.outcome.saved.unwrap();
    assert_eq!(saved.score, 30_000);
    assert_eq!(saved.source.file_name().unwrap(), "000002.jpg");
}

#[test]
fn degraded_mode_accepts_by_size() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), 1);
    let crawler = ScriptedCrawler::new().on("p0", Script::Files(vec![low_res()]));
    let processor = DeviceProcessor::new(&settings, &crawler, &FileSizeScorer, None);

    let outcome = processor.process(&laptop(), &mut |_: &ShotEvent| {}).unwrap();
    let saved = outcome.saved.unwrap();
    assert!(!saved.converted);
    assert_eq!(outcome.candidates[0].dimensions, None);
}

#[test]
fn plan_lists_every_tier_in_order() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path(), 2);
    let crawler = ScriptedCrawler::new();
    let processor = DeviceProcessor::new(&settings, &crawler, &FileSizeScorer, None);

    let plan = processor.plan(&laptop());
    let labels: Vec<_> = plan
        .iter()
        .map(|p| format!("{}_{}:{}", p.engine, p.tier, p.query))
        .collect();
    assert_eq!(
        labels,
        vec!["bing_0:p0", "bing_1:p1", "bing_2:p2", "baidu_0:s0", "baidu_1:s1"]
    );
    assert_eq!(plan[4].list, TierList::Secondary);
    assert!(crawler.requests.borrow().is_empty());
}

#[test]
fn events_follow_tier_order() {
    let tmp = TempDir::new().unwrap();
    let crawler = ScriptedCrawler::new().on("p0", Script::Files(vec![good(30_000), low_res()]));
    let run = run(tmp.path(), 1, crawler);

    let kinds: Vec<&str> = run
        .events
        .iter()
        .map(|e| match e {
            ShotEvent::TierStarted { .. } => "start",
            ShotEvent::Rejected { .. } => "rejected",
            ShotEvent::TierFinished { .. } => "finish",
            ShotEvent::Saved { .. } => "saved",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["start", "rejected", "finish", "saved"]);
    assert!(matches!(
        run.events[2],
        ShotEvent::TierFinished { new_files: 2, accepted: 1, .. }
    ));
}
