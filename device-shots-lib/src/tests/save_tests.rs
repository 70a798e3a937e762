use tempfile::TempDir;

use super::*;
use crate::score::FileSizeScorer;
use crate::test_support::{FakeCodec, FakeImage};

fn candidate(dir: &Path, name: &str, image: FakeImage) -> Candidate {
    let path = dir.join("raw").join(name);
    image.write(&path);
    Candidate {
        path,
        size: image.size as u64,
        dimensions: Some((image.width, image.height)),
    }
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn output_path_uses_slug_and_format_extension() {
    let out = PathBuf::from("images");
    let jpeg = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, None);
    let png = Saver::new(&out, OutputFormat::Png, 90, &FileSizeScorer, None);
    assert_eq!(jpeg.output_path("dell_xps_13"), out.join("dell_xps_13.jpg"));
    assert_eq!(png.output_path("dell_xps_13"), out.join("dell_xps_13.png"));
}

#[test]
fn empty_candidates_touch_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, Some(&FakeCodec));
    assert_eq!(saver.save(&[], "lenovo_yoga_slim_7x").unwrap(), None);
    assert!(!out.exists());
}

#[test]
fn saves_largest_candidate_unchanged_when_already_canonical() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let small = candidate(tmp.path(), "000001.jpg", FakeImage::new(1600, 900, 30_000));
    let large = candidate(tmp.path(), "000002.jpg", FakeImage::new(1600, 900, 90_000));
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, Some(&FakeCodec));

    let saved = saver.save(&[small, large.clone()], "hp_spectre_x360").unwrap().unwrap();
    assert_eq!(saved.path, out.join("hp_spectre_x360.jpg"));
    assert_eq!(saved.source, large.path);
    assert_eq!(saved.score, 90_000);
    assert!(!saved.converted);
    assert_eq!(std::fs::read(&saved.path).unwrap(), std::fs::read(&large.path).unwrap());
    assert_eq!(output_files(&out), vec!["hp_spectre_x360.jpg"]);
}

#[test]
fn converts_non_canonical_winner() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let webp = candidate(tmp.path(), "000001.webp", FakeImage::new(1600, 900, 60_000).format("webp"));
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, Some(&FakeCodec));

    let saved = saver.save(&[webp], "asus_zenbook_14").unwrap().unwrap();
    assert!(saved.converted);
    assert!(FakeCodec.is_format(&saved.path, OutputFormat::Jpeg).unwrap());
    assert_eq!(output_files(&out), vec!["asus_zenbook_14.jpg"]);
}

#[test]
fn failed_conversion_falls_back_to_copy() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let broken = candidate(tmp.path(), "000001.png", FakeImage::new(1600, 900, 60_000).format("broken"));
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, Some(&FakeCodec));

    let saved = saver.save(&[broken.clone()], "acer_swift_go_14").unwrap().unwrap();
    assert!(!saved.converted);
    assert_eq!(std::fs::read(&saved.path).unwrap(), std::fs::read(&broken.path).unwrap());
    // No temporary file left behind
    assert_eq!(output_files(&out), vec!["acer_swift_go_14.jpg"]);
}

#[test]
fn without_codec_copies_bytes() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let webp = candidate(tmp.path(), "000001.webp", FakeImage::new(1600, 900, 60_000).format("webp"));
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, None);

    let saved = saver.save(&[webp.clone()], "surface_laptop_7").unwrap().unwrap();
    assert!(!saved.converted);
    assert_eq!(saved.path, out.join("surface_laptop_7.jpg"));
    assert_eq!(std::fs::read(&saved.path).unwrap(), std::fs::read(&webp.path).unwrap());
}

#[test]
fn rerun_replaces_previous_output() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, Some(&FakeCodec));

    let first = candidate(tmp.path(), "000001.jpg", FakeImage::new(1600, 900, 30_000));
    saver.save(&[first], "dell_xps_13").unwrap();
    let second = candidate(tmp.path(), "000002.jpg", FakeImage::new(1920, 1080, 45_000));
    let saved = saver.save(&[second.clone()], "dell_xps_13").unwrap().unwrap();

    assert_eq!(std::fs::read(&saved.path).unwrap(), std::fs::read(&second.path).unwrap());
    assert_eq!(output_files(&out), vec!["dell_xps_13.jpg"]);
}

#[test]
fn equal_scores_pick_first_candidate() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let a = candidate(tmp.path(), "000001.jpg", FakeImage::new(1600, 900, 50_000));
    let b = candidate(tmp.path(), "000002.jpg", FakeImage::new(1920, 1080, 50_000));
    let saver = Saver::new(&out, OutputFormat::Jpeg, 90, &FileSizeScorer, None);

    let saved = saver.save(&[a.clone(), b], "lg_gram_16").unwrap().unwrap();
    assert_eq!(saved.source, a.path);
}
