use std::panic::{self, PanicHookInfo};
use std::path::Path;
use std::time::Duration;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use device_shots_crawler::{CrawlerConfig, WebCrawler};
use device_shots_lib::{
    DeviceProcessor, FileSizeScorer, RunConfig, RunReport, ShotEvent, TierList, resolve_codec,
    run_devices,
};

use crate::cli_types::RunArgs;
use crate::error::CliError;
use crate::spinner::DeviceSpinner;

/// Run-log file written into the output directory.
const RUN_LOG_NAME: &str = "device-shots.log";

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Routes panic reports to the debug log while installed. Panics inside a
/// run are caught and recorded as failures. The previous hook comes back on
/// drop.
struct QuietPanics {
    previous: Option<PanicHook>,
}

impl QuietPanics {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| log::debug!("contained panic: {info}")));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

/// Fold command-line overrides into the loaded configuration and narrow
/// the catalog to `--only`. The merged settings are checked again.
pub(crate) fn apply_overrides(config: &mut RunConfig, args: &RunArgs) -> Result<(), CliError> {
    let settings = &mut config.settings;
    if let Some(dir) = &args.output_dir {
        settings.paths.output_dir = dir.clone();
    }
    if let Some(dir) = &args.raw_dir {
        settings.paths.raw_root = dir.clone();
    }
    if let Some(min) = args.min_candidates {
        settings.selection.min_candidates = min;
    }
    if let Some(threads) = args.threads {
        if threads == 0 {
            return Err(CliError::config("--threads must be at least 1"));
        }
        settings.search.download_threads = threads;
    }
    if let Some(engine) = args.primary_engine {
        settings.search.primary_engine = engine;
    }
    if let Some(engine) = args.secondary_engine {
        settings.search.secondary_engine = engine;
    }
    settings.check()?;
    if let Some(only) = &args.only {
        config.catalog = config
            .catalog
            .retain_slugs(only)
            .map_err(|e| CliError::config(e.to_string()))?;
    }
    Ok(())
}

pub(crate) fn run_shots(
    settings_file: Option<&Path>,
    devices_file: Option<&Path>,
    args: RunArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let mut config = super::load_config(settings_file, devices_file)?;
    apply_overrides(&mut config, &args)?;
    let RunConfig { settings, catalog } = &config;

    let codec = resolve_codec(!args.no_codec);
    if codec.is_none() {
        if args.no_codec {
            log::info!("Codec disabled: size-only validation, images copied unconverted");
        } else {
            log::warn!("No image codec available: size-only validation, images copied unconverted");
        }
    }

    let crawler = WebCrawler::new(CrawlerConfig {
        download_threads: settings.search.download_threads,
        timeout: Duration::from_secs(settings.search.timeout_secs),
    })
    .map_err(|e| CliError::crawler(e.to_string()))?;
    let processor = DeviceProcessor::new(settings, &crawler, &FileSizeScorer, codec.as_deref());

    if args.dry_run {
        print_plan(&config, &processor);
        return Ok(());
    }

    log::info!(
        "Fetching images for {} device(s) into {}",
        catalog.len(),
        settings
            .paths
            .output_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    let spinner = DeviceSpinner::new(quiet);
    let quiet_panics = QuietPanics::install();
    let report = run_devices(catalog, &processor, &mut |event: &ShotEvent| {
        report_event(&spinner, event);
    });
    drop(quiet_panics);
    spinner.finish();

    print_summary(&report);

    if !args.no_log {
        let log_path = settings.paths.output_dir.join(RUN_LOG_NAME);
        match report.write_to_file(&log_path) {
            Ok(()) => log::info!("Log written to {}", log_path.display()),
            Err(e) => log::warn!("Could not write {}: {}", log_path.display(), e),
        }
    }

    Ok(())
}

fn report_event(spinner: &DeviceSpinner, event: &ShotEvent) {
    match event {
        ShotEvent::DeviceStarted { index, total, slug } => spinner.suspend(|| {
            log::info!("");
            log::info!(
                "[{}/{}] {}",
                index + 1,
                total,
                slug.if_supports_color(Stdout, |t| t.bold()),
            );
        }),
        ShotEvent::TierStarted {
            engine, tier, query, ..
        } => spinner.set_message(format!("{}_{}: \"{}\"", engine, tier, query)),
        ShotEvent::CrawlFailed {
            engine,
            tier,
            message,
            ..
        } => spinner.suspend(|| {
            log::warn!(
                "  {} {}_{}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                engine,
                tier,
                message,
            );
        }),
        ShotEvent::Rejected { .. } => {}
        ShotEvent::TierFinished {
            engine,
            tier,
            new_files,
            accepted,
            ..
        } => spinner.suspend(|| {
            log::info!(
                "  {}_{}: {} new, {} valid",
                engine,
                tier,
                new_files,
                accepted,
            );
        }),
        ShotEvent::Saved {
            path, converted, ..
        } => spinner.suspend(|| {
            log::info!(
                "  {} {}{}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display(),
                if *converted { " (converted)" } else { "" },
            );
        }),
        ShotEvent::NoImage { slug } => spinner.suspend(|| {
            log::warn!(
                "  {} no valid image for {}",
                "?".if_supports_color(Stdout, |t| t.yellow()),
                slug,
            );
        }),
        ShotEvent::DeviceFailed { slug, message } => spinner.suspend(|| {
            log::error!(
                "  {} {} failed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                slug,
                message,
            );
        }),
    }
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();
    log::info!("");
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} Saved {}/{} ({} converted)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.saved,
        summary.total,
        summary.converted,
    );
    if !summary.missing.is_empty() {
        log::warn!(
            "  {} No image: {}",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.missing.join(", "),
        );
    }
    if summary.failed > 0 {
        log::warn!(
            "  {} {} device(s) failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }
}

fn print_plan(config: &RunConfig, processor: &DeviceProcessor<'_>) {
    let settings = &config.settings;
    log::info!(
        "{} {} device(s), stop primary search at {} candidate(s)",
        "Dry run:".if_supports_color(Stdout, |t| t.bold()),
        config.catalog.len(),
        settings.selection.min_candidates,
    );
    for device in config.catalog.devices() {
        log::info!("");
        log::info!(
            "{} -> {}",
            device.slug.if_supports_color(Stdout, |t| t.bold()),
            processor.saver().output_path(&device.slug).display(),
        );
        for tier in processor.plan(device) {
            let label = match tier.list {
                TierList::Primary => "primary",
                TierList::Secondary => "fallback",
            };
            log::info!(
                "  {:<8} {}_{} x{} \"{}\" -> {}",
                label,
                tier.engine,
                tier.tier,
                tier.max_count,
                tier.query,
                tier.dir.display().if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}
