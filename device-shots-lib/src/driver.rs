//! Run driver: every device in catalog order, one at a time.

use std::panic::{self, AssertUnwindSafe};

use device_shots_core::DeviceCatalog;

use crate::ShotError;
use crate::error::panic_message;
use crate::processor::DeviceProcessor;
use crate::progress::ShotEvent;
use crate::report::{ReportEntry, RunReport};

/// Process each device in `catalog` and collect the results.
///
/// A device that errors or panics is recorded as failed and the run
/// continues with the next one. Nothing is retried.
pub fn run_devices(
    catalog: &DeviceCatalog,
    processor: &DeviceProcessor<'_>,
    on_event: &mut dyn FnMut(&ShotEvent),
) -> RunReport {
    let total = catalog.len();
    let mut report = RunReport::new();

    for (index, device) in catalog.devices().iter().enumerate() {
        on_event(&ShotEvent::DeviceStarted {
            index,
            total,
            slug: device.slug.clone(),
        });

        let result =
            panic::catch_unwind(AssertUnwindSafe(|| processor.process(device, &mut *on_event)))
                .unwrap_or_else(|payload| Err(ShotError::Panicked(panic_message(&*payload))));

        let entry = match result {
            Ok(outcome) => ReportEntry::from_outcome(&outcome),
            Err(e) => {
                log::warn!("{}: {}", device.slug, e);
                on_event(&ShotEvent::DeviceFailed {
                    slug: device.slug.clone(),
                    message: e.to_string(),
                });
                ReportEntry::failed(&device.slug, e.to_string())
            }
        };
        report.add(entry);
    }

    report
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
