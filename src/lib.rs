//! Height Cache - measured-height caching for virtualized lists
//!
//! Keeps the rendered height of list items so a virtualized list can lay
//! out without re-measuring. Heights are preloaded in bounded batches on a
//! single render thread and invalidated in response to environment signals.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod measure;
pub mod models;
pub mod preload;
pub mod render;
pub mod render_thread;

pub use api::AppState;
pub use cache::{CacheStatistics, HeightCache};
pub use config::Config;
pub use error::{HeightError, Result};
pub use lifecycle::{EnvironmentSignal, LifecycleManager, SignalBus};
pub use measure::{classify_raw_height, LayoutMeasurer, ListItem, TextItem, TextMeasurer};
pub use preload::{BatchPreloader, PreloadReport};
pub use render::HeightResolver;
pub use render_thread::RenderThread;
