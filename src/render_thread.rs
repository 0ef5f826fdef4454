//! Render Thread
//!
//! The single OS thread that owns the layout measurer. Every measurement,
//! whichever task asks for it, is executed here one at a time.

use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{HeightError, Result};
use crate::measure::LayoutMeasurer;

struct MeasureJob<I> {
    item: I,
    width: f64,
    /// `None` when the measurer panicked on this item
    reply: oneshot::Sender<Option<f64>>,
}

// == Render Thread ==
/// Handle for submitting measurements to the render thread.
///
/// The thread exits once every handle has been dropped.
pub struct RenderThread<I> {
    jobs: mpsc::UnboundedSender<MeasureJob<I>>,
}

impl<I> Clone for RenderThread<I> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<I> fmt::Debug for RenderThread<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderThread")
            .field("closed", &self.jobs.is_closed())
            .finish()
    }
}

impl<I: Send + 'static> RenderThread<I> {
    // == Spawn ==
    /// Starts the render thread. `make_measurer` runs on the new thread, so
    /// the measurer itself never crosses threads.
    pub fn spawn<M, F>(make_measurer: F) -> io::Result<Self>
    where
        F: FnOnce() -> M + Send + 'static,
        M: LayoutMeasurer<I> + 'static,
    {
        let (jobs, mut receiver) = mpsc::unbounded_channel::<MeasureJob<I>>();

        thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let mut measurer = make_measurer();
                info!("render thread started");

                while let Some(job) = receiver.blocking_recv() {
                    let measured = panic::catch_unwind(AssertUnwindSafe(|| {
                        measurer.measure(&job.item, job.width)
                    }));
                    let raw = match measured {
                        Ok(raw) => Some(raw),
                        Err(_) => {
                            warn!(width = job.width, "measurer panicked, render thread continues");
                            None
                        }
                    };
                    // The requester may have been cancelled meanwhile.
                    let _ = job.reply.send(raw);
                }

                debug!("render thread stopped");
            })?;

        Ok(Self { jobs })
    }

    // == Measure ==
    /// Measures `item` at `width` on the render thread and returns the raw value.
    ///
    /// A panic inside the measurer fails only this call.
    pub async fn measure(&self, item: I, width: f64) -> Result<f64> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send(MeasureJob { item, width, reply })
            .map_err(|_| HeightError::RenderThreadUnavailable)?;
        response
            .await
            .map_err(|_| HeightError::RenderThreadUnavailable)?
            .ok_or(HeightError::MeasurementFailed)
    }
}
