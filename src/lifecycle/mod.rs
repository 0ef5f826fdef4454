//! Lifecycle Module
//!
//! Environment signals and the manager that keeps the height cache coherent
//! with them.

mod manager;
mod signals;

pub use manager::{LifecycleManager, LifecycleState, SignalAction};
pub use signals::{EnvironmentSignal, SignalBus, DEFAULT_BUS_CAPACITY};
