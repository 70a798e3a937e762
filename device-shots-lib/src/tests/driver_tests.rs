use std::cell::Cell;

use device_shots_core::{CrawlError, CrawlRequest, DeviceSpec, ImageCrawler};
use tempfile::TempDir;

use super::*;
use crate::report::DeviceStatus;
use crate::score::{FileSizeScorer, Scorer};
use crate::settings::Settings;
use crate::test_support::{FakeCodec, FakeImage, Script, ScriptedCrawler};
use crate::validate::Candidate;

fn settings(root: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.paths.raw_root = root.join("raw");
    settings.paths.output_dir = root.join("out");
    settings.selection.min_candidates = 1;
    settings
}

fn catalog() -> DeviceCatalog {
    DeviceCatalog::new(vec![
        DeviceSpec::new("alpha").with_primary("alpha press"),
        DeviceSpec::new("bravo").with_primary("bravo press").with_secondary("bravo cn"),
        DeviceSpec::new("charlie").with_primary("charlie press"),
    ])
    .unwrap()
}

#[test]
fn missing_device_does_not_stop_the_run() {
    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path());
    let crawler = ScriptedCrawler::new()
        .on("alpha press", Script::Files(vec![FakeImage::new(1600, 900, 30_000)]))
        .on("charlie press", Script::Files(vec![FakeImage::new(1200, 800, 30_000)]));
    let processor = DeviceProcessor::new(&settings, &crawler, &FileSizeScorer, Some(&FakeCodec));

    let mut started = Vec::new();
    let report = run_devices(&catalog(), &processor, &mut |e: &ShotEvent| {
        if let ShotEvent::DeviceStarted { index, total, slug } = e {
            started.push(format!("{}/{} {}", index + 1, total, slug));
        }
    });

    assert_eq!(started, vec!["1/3 alpha", "2/3 bravo", "3/3 charlie"]);
    let summary = report.summary();
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.no_image, 1);
    assert_eq!(summary.missing, vec!["bravo"]);
    assert!(tmp.path().join("out/alpha.jpg").is_file());
    assert!(tmp.path().join("out/charlie.jpg").is_file());
    assert!(!tmp.path().join("out/bravo.jpg").exists());
}

#[test]
fn panicking_device_is_recorded_as_failed() {
    // The scorer panics for one device only; the crawler adapter cannot see
    // it, so the driver has to contain it.
    struct Grumpy {
        calls: Cell<usize>,
    }
    impl Scorer for Grumpy {
        fn score(&self, candidate: &Candidate) -> u64 {
            self.calls.set(self.calls.get() + 1);
            if candidate.path.to_string_lossy().contains("bravo") {
                panic!("cannot score bravo");
            }
            candidate.size
        }
    }

    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path());
    let image = FakeImage::new(1600, 900, 30_000);
    let crawler = ScriptedCrawler::new()
        .on("alpha press", Script::Files(vec![image]))
        .on("bravo press", Script::Files(vec![image]))
        .on("charlie press", Script::Files(vec![image]));
    let scorer = Grumpy { calls: Cell::new(0) };
    let processor = DeviceProcessor::new(&settings, &crawler, &scorer, Some(&FakeCodec));

    let mut failed = Vec::new();
    let report = run_devices(&catalog(), &processor, &mut |e: &ShotEvent| {
        if let ShotEvent::DeviceFailed { slug, message } = e {
            failed.push((slug.clone(), message.clone()));
        }
    });

    assert_eq!(scorer.calls.get(), 3);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "bravo");
    assert!(failed[0].1.contains("cannot score bravo"));

    let statuses: Vec<_> = report.entries().iter().map(|e| &e.status).collect();
    assert!(matches!(statuses[0], DeviceStatus::Saved { .. }));
    assert!(matches!(statuses[1], DeviceStatus::Failed { .. }));
    assert!(matches!(statuses[2], DeviceStatus::Saved { .. }));
}

#[test]
fn crawler_that_always_fails_yields_no_images() {
    struct Offline;
    impl ImageCrawler for Offline {
        fn crawl(&self, _request: &CrawlRequest<'_>) -> Result<usize, CrawlError> {
            Err(CrawlError::search("dns error"))
        }
    }

    let tmp = TempDir::new().unwrap();
    let settings = settings(tmp.path());
    let processor = DeviceProcessor::new(&settings, &Offline, &FileSizeScorer, None);

    let report = run_devices(&catalog(), &processor, &mut |_: &ShotEvent| {});
    let summary = report.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.saved, 0);
    assert_eq!(summary.no_image, 3);
    assert_eq!(report.entries()[1].crawl_failures, 2);
    assert_eq!(report.entries()[1].tiers, vec!["bing_0", "baidu_0"]);
}
