//! Lifecycle Manager
//!
//! Subscribes to the signal bus while started and turns environment signals
//! into cache operations.
//!
//! | signal              | action                          |
//! |---------------------|---------------------------------|
//! | orientation changed | none (logged)                   |
//! | font scale changed  | clear the whole cache           |
//! | memory pressure     | trim to the most recent half    |
//! | entered background  | none, cache kept for resume     |
//! | entering foreground | log current statistics          |

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::HeightCache;
use crate::lifecycle::{EnvironmentSignal, SignalBus};

// == Lifecycle State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Stopped,
    Started,
}

// == Signal Action ==
/// What the manager did in response to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Ignored,
    ClearedCache,
    TrimmedForMemoryPressure,
    ReportedStatistics,
}

// == Lifecycle Manager ==
#[derive(Debug)]
pub struct LifecycleManager {
    cache: HeightCache,
    bus: SignalBus,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl LifecycleManager {
    pub fn new(cache: HeightCache, bus: SignalBus) -> Self {
        Self {
            cache,
            bus,
            listener: Mutex::new(None),
        }
    }

    fn listener(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Start ==
    /// Subscribes to the bus. Returns `false` if already started.
    ///
    /// Signals emitted after this returns are guaranteed to be observed.
    pub fn start(&self) -> bool {
        let mut listener = self.listener();
        if listener.as_ref().is_some_and(|handle| !handle.is_finished()) {
            info!("lifecycle manager already started");
            return false;
        }

        let mut signals = self.bus.subscribe();
        let cache = self.cache.clone();
        *listener = Some(tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(signal) => {
                        apply_signal(&cache, signal);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // A dropped font-scale change would leave stale heights behind.
                        warn!(missed, "signal listener lagged, clearing height cache");
                        cache.clear_cache();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("signal bus closed");
        }));

        info!("lifecycle manager started");
        true
    }

    // == Stop ==
    /// Unsubscribes from the bus. Returns `false` if already stopped.
    pub fn stop(&self) -> bool {
        match self.listener().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                info!("lifecycle manager stopped");
                true
            }
            _ => {
                info!("lifecycle manager already stopped");
                false
            }
        }
    }

    /// `Started` only while the listener task is still running.
    pub fn state(&self) -> LifecycleState {
        if self
            .listener()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
        {
            LifecycleState::Started
        } else {
            LifecycleState::Stopped
        }
    }

    // == Handle Signal ==
    /// Applies `signal` directly, bypassing the bus.
    pub fn handle_signal(&self, signal: EnvironmentSignal) -> SignalAction {
        apply_signal(&self.cache, signal)
    }

    // == Manual Invalidation ==
    /// Drops one item's height, e.g. after its content changed.
    pub fn invalidate_one(&self, item_id: impl Into<String>) {
        self.cache.clear_height(item_id);
    }

    /// Drops every cached height.
    pub fn invalidate_all(&self) {
        self.cache.clear_cache();
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        if let Some(handle) = self.listener().take() {
            handle.abort();
        }
    }
}

fn apply_signal(cache: &HeightCache, signal: EnvironmentSignal) -> SignalAction {
    match signal {
        EnvironmentSignal::OrientationChanged => {
            debug!("orientation changed, heights at a fixed width are unaffected");
            SignalAction::Ignored
        }
        EnvironmentSignal::FontScaleChanged => {
            info!("font scale changed, clearing height cache");
            cache.clear_cache();
            SignalAction::ClearedCache
        }
        EnvironmentSignal::MemoryPressure => {
            warn!("memory pressure, trimming height cache");
            cache.handle_memory_pressure();
            SignalAction::TrimmedForMemoryPressure
        }
        EnvironmentSignal::EnteredBackground => {
            debug!("entered background, keeping height cache");
            SignalAction::Ignored
        }
        EnvironmentSignal::EnteringForeground => {
            let stats = cache.statistics();
            info!(
                count = stats.count,
                max_size = stats.max_size,
                usage_ratio = stats.usage_ratio,
                hit_rate = stats.hit_rate(),
                "returning to foreground"
            );
            SignalAction::ReportedStatistics
        }
    }
}
