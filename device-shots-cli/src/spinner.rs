//! Single-line progress spinner for the device currently being processed.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub(crate) struct DeviceSpinner {
    pb: ProgressBar,
}

impl DeviceSpinner {
    /// A ticking spinner, or a hidden one when `quiet`.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
                pb.set_style(style.tick_chars("/-\\|"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        Self { pb }
    }

    pub(crate) fn set_message(&self, msg: String) {
        self.pb.set_message(msg);
    }

    /// Run `f` (typically a log call) with the spinner line cleared.
    pub(crate) fn suspend<F: FnOnce()>(&self, f: F) {
        self.pb.suspend(f);
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
