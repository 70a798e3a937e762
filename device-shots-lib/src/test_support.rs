//! Fakes shared by the unit tests: a content-keyed codec and a scripted
//! crawler.
//!
//! Fake image files start with a header line `fake:<W>x<H>:<format>` and are
//! padded with zeros to the requested size, so the codec can answer without
//! any real decoding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use device_shots_core::{CrawlError, CrawlRequest, Engine, ImageCrawler};

use crate::ShotError;
use crate::codec::{ImageCodec, OutputFormat};

#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeImage {
    pub width: u32,
    pub height: u32,
    pub size: usize,
    /// `jpeg`, `png`, `webp`; `broken` makes re-encoding fail
    pub format: &'static str,
}

impl FakeImage {
    pub fn new(width: u32, height: u32, size: usize) -> Self {
        Self {
            width,
            height,
            size,
            format: "jpeg",
        }
    }

    pub fn format(mut self, format: &'static str) -> Self {
        self.format = format;
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut data = format!("fake:{}x{}:{}\n", self.width, self.height, self.format).into_bytes();
        if data.len() < self.size {
            data.resize(self.size, 0);
        }
        data
    }

    pub fn write(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, self.bytes()).unwrap();
    }
}

fn read_header(path: &Path) -> Result<(u32, u32, String), ShotError> {
    let mut buf = [0u8; 64];
    let n = std::fs::File::open(path)?.read(&mut buf)?;
    let text = String::from_utf8_lossy(&buf[..n]);
    let line = text.lines().next().unwrap_or_default();
    let parse = || -> Option<(u32, u32, String)> {
        let rest = line.strip_prefix("fake:")?;
        let (dims, format) = rest.split_once(':')?;
        let (w, h) = dims.split_once('x')?;
        Some((w.parse().ok()?, h.parse().ok()?, format.to_string()))
    };
    parse().ok_or_else(|| ShotError::codec(format!("not an image: {}", path.display())))
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Jpeg => "jpeg",
        OutputFormat::Png => "png",
    }
}

/// Codec that understands the fake header format.
#[derive(Debug, Default)]
pub(crate) struct FakeCodec;

impl ImageCodec for FakeCodec {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ShotError> {
        read_header(path).map(|(w, h, _)| (w, h))
    }

    fn is_format(&self, path: &Path, format: OutputFormat) -> Result<bool, ShotError> {
        read_header(path).map(|(_, _, f)| f == format_name(format))
    }

    fn reencode(
        &self,
        src: &Path,
        dst: &Path,
        format: OutputFormat,
        _quality: u8,
    ) -> Result<(), ShotError> {
        let (width, height, current) = read_header(src)?;
        if current == "broken" {
            // Leave a partial file behind, like a real encoder failing midway
            std::fs::write(dst, b"partial")?;
            return Err(ShotError::codec("unsupported color type"));
        }
        let size = std::fs::metadata(src)?.len() as usize;
        FakeImage {
            width,
            height,
            size,
            format: format_name(format),
        }
        .write(dst);
        Ok(())
    }
}

/// What the scripted crawler does for one query.
pub(crate) enum Script {
    /// Write these files, then succeed
    Files(Vec<FakeImage>),
    /// Write these files, then fail
    FailAfter(Vec<FakeImage>),
    Panic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub engine: Engine,
    pub query: String,
    pub dest: PathBuf,
    pub max_count: usize,
}

/// Crawler that plays back a script keyed by query string and records every
/// request. Unscripted queries produce no files.
#[derive(Default)]
pub(crate) struct ScriptedCrawler {
    scripts: HashMap<String, Script>,
    pub requests: RefCell<Vec<Recorded>>,
}

impl ScriptedCrawler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, query: &str, script: Script) -> Self {
        self.scripts.insert(query.to_string(), script);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.query.clone()).collect()
    }

    fn write_all(dest: &Path, files: &[FakeImage]) -> usize {
        let existing = std::fs::read_dir(dest).map(|d| d.count()).unwrap_or(0);
        for (i, file) in files.iter().enumerate() {
            file.write(&dest.join(format!("{:06}.jpg", existing + i + 1)));
        }
        files.len()
    }
}

impl ImageCrawler for ScriptedCrawler {
    fn crawl(&self, request: &CrawlRequest<'_>) -> Result<usize, CrawlError> {
        self.requests.borrow_mut().push(Recorded {
            engine: request.engine,
            query: request.query.to_string(),
            dest: request.dest.to_path_buf(),
            max_count: request.max_count,
        });
        match self.scripts.get(request.query) {
            None => Ok(0),
            Some(Script::Files(files)) => Ok(Self::write_all(request.dest, files)),
            Some(Script::FailAfter(files)) => {
                Self::write_all(request.dest, files);
                Err(CrawlError::search("connection reset"))
            }
            Some(Script::Panic) => panic!("crawler exploded on {}", request.query),
        }
    }
}
