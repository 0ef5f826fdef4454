//! Environment Signals
//!
//! Typed notifications from the host environment and the broadcast bus that
//! carries them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::HeightError;

/// Default number of undelivered signals a subscriber may lag behind
pub const DEFAULT_BUS_CAPACITY: usize = 64;

// == Environment Signal ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentSignal {
    OrientationChanged,
    FontScaleChanged,
    MemoryPressure,
    EnteredBackground,
    EnteringForeground,
}

impl EnvironmentSignal {
    pub const ALL: [EnvironmentSignal; 5] = [
        EnvironmentSignal::OrientationChanged,
        EnvironmentSignal::FontScaleChanged,
        EnvironmentSignal::MemoryPressure,
        EnvironmentSignal::EnteredBackground,
        EnvironmentSignal::EnteringForeground,
    ];

    /// Short name used in logs and on the diagnostics API.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentSignal::OrientationChanged => "orientation",
            EnvironmentSignal::FontScaleChanged => "font-scale",
            EnvironmentSignal::MemoryPressure => "memory-pressure",
            EnvironmentSignal::EnteredBackground => "background",
            EnvironmentSignal::EnteringForeground => "foreground",
        }
    }
}

impl fmt::Display for EnvironmentSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentSignal {
    type Err = HeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|signal| signal.as_str() == s)
            .ok_or_else(|| HeightError::UnknownSignal(s.to_string()))
    }
}

// == Signal Bus ==
/// Fan-out channel for environment signals.
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<EnvironmentSignal>,
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EnvironmentSignal> {
        self.sender.subscribe()
    }

    // == Emit ==
    /// Publishes `signal` and returns how many subscribers will see it.
    pub fn emit(&self, signal: EnvironmentSignal) -> usize {
        match self.sender.send(signal) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!(signal = %signal, "signal emitted with no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}
