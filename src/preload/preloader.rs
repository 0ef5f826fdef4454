//! Batch Preloader
//!
//! Fills the height cache for items that are about to be displayed.
//!
//! Missing items are split into chunks of `max_concurrent`. Each chunk runs
//! one task per admitted item and is fully joined before the next chunk
//! starts, so slots from one chunk are always released before the next one
//! asks for admission.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::cache::HeightCache;
use crate::measure::{classify_raw_height, ListItem};
use crate::preload::{AdmissionSet, AdmissionSlot};
use crate::render_thread::RenderThread;

// == Preload Report ==
/// Outcome of one `batch_preload_heights` call.
///
/// Coverage is best effort: `skipped` items stay uncached until a later call
/// or the render pipeline's on-demand measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Items passed in
    pub requested: usize,
    /// Items that already had a height
    pub already_cached: usize,
    /// Items that obtained an admission slot
    pub admitted: usize,
    /// Items refused admission (saturated or already in flight)
    pub skipped: usize,
    /// Items measured and queued for storage
    pub measured: usize,
    /// Items whose measurement was cancelled
    pub cancelled: usize,
}

// == Batch Preloader ==
pub struct BatchPreloader<I> {
    cache: HeightCache,
    render: RenderThread<I>,
    admission: Arc<AdmissionSet>,
    max_concurrent: usize,
}

impl<I> Clone for BatchPreloader<I> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            render: self.render.clone(),
            admission: Arc::clone(&self.admission),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<I> fmt::Debug for BatchPreloader<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchPreloader")
            .field("max_concurrent", &self.max_concurrent)
            .field("in_flight", &self.admission.in_flight())
            .finish()
    }
}

impl<I> BatchPreloader<I>
where
    I: ListItem + Clone + Send + Sync + 'static,
{
    /// Creates a preloader writing into `cache` and measuring on `render`.
    pub fn new(cache: HeightCache, render: RenderThread<I>, max_concurrent: usize) -> Self {
        let admission = Arc::new(AdmissionSet::new(max_concurrent));
        let max_concurrent = admission.max_in_flight();
        Self {
            cache,
            render,
            admission,
            max_concurrent,
        }
    }

    // == Batch Preload Heights ==
    /// Measures and caches every item in `items` that has no cached height.
    ///
    /// Items that cannot be admitted are skipped for this call, not retried.
    pub async fn batch_preload_heights(&self, items: &[I], width: f64) -> PreloadReport {
        let mut report = PreloadReport {
            requested: items.len(),
            ..Default::default()
        };

        let missing: Vec<&I> = items
            .iter()
            .filter(|item| !self.cache.contains(item.item_id()))
            .collect();
        report.already_cached = items.len() - missing.len();

        if missing.is_empty() {
            debug!(requested = items.len(), "preload: every item already cached");
            return report;
        }

        for chunk in missing.chunks(self.max_concurrent) {
            let mut tasks = JoinSet::new();

            for item in chunk {
                let slot = match self.admission.try_admit(item.item_id()) {
                    Ok(slot) => slot,
                    Err(e) => {
                        warn!(error = %e, "preload skipped");
                        report.skipped += 1;
                        continue;
                    }
                };
                report.admitted += 1;

                let ticket = slot.ticket();
                let abort = tasks.spawn(measure_and_store(
                    self.render.clone(),
                    self.cache.clone(),
                    (*item).clone(),
                    width,
                    slot,
                ));
                self.admission.attach(item.item_id(), ticket, abort);
            }

            // Barrier: the next chunk starts only after this one has drained.
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(true) => report.measured += 1,
                    Ok(false) => {}
                    Err(e) if e.is_cancelled() => report.cancelled += 1,
                    Err(e) => warn!(error = %e, "preload task failed"),
                }
            }
        }

        info!(
            requested = report.requested,
            already_cached = report.already_cached,
            measured = report.measured,
            skipped = report.skipped,
            cancelled = report.cancelled,
            width,
            "preload batch finished"
        );
        report
    }

    // == Spawn Preload ==
    /// Runs a batch in the background. Aborting the returned handle cancels
    /// every unit still in flight and releases their slots.
    pub fn spawn_preload(&self, items: Vec<I>, width: f64) -> JoinHandle<PreloadReport> {
        let preloader = self.clone();
        tokio::spawn(async move { preloader.batch_preload_heights(&items, width).await })
    }

    // == Cancel ==
    /// Cancels the in-flight measurement of one item, e.g. when it scrolls
    /// out of view. Returns whether a measurement was running.
    pub fn cancel(&self, item_id: &str) -> bool {
        let cancelled = self.admission.cancel(item_id);
        if cancelled {
            debug!(item_id, "preload cancelled");
        }
        cancelled
    }

    /// Number of measurements currently in flight.
    pub fn in_flight(&self) -> usize {
        self.admission.in_flight()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// One preload unit. The slot lives as long as this future, so completion,
/// failure and cancellation all release it.
async fn measure_and_store<I>(
    render: RenderThread<I>,
    cache: HeightCache,
    item: I,
    width: f64,
    slot: AdmissionSlot,
) -> bool
where
    I: ListItem + Send + 'static,
{
    let item_id = slot.item_id().to_string();

    match render.measure(item, width).await {
        Ok(raw) => {
            let height = classify_raw_height(raw);
            debug!(item_id = %item_id, raw, height, "preload measured");
            cache.set_height(height, item_id);
            true
        }
        Err(e) => {
            warn!(item_id = %item_id, error = %e, "preload measurement failed");
            false
        }
    }
}
