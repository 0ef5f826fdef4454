//! Render-side height lookup.
//!
//! On first display an item's height comes from the cache when present.
//! On a miss it is measured on the render thread right away and written
//! back, so layout never depends on preloading having run.

use tracing::{debug, warn};

use crate::cache::HeightCache;
use crate::measure::{classify_raw_height, ListItem, FALLBACK_HEIGHT};
use crate::render_thread::RenderThread;

#[derive(Debug)]
pub struct HeightResolver<I> {
    cache: HeightCache,
    render: RenderThread<I>,
}

impl<I> Clone for HeightResolver<I> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            render: self.render.clone(),
        }
    }
}

impl<I> HeightResolver<I>
where
    I: ListItem + Clone + Send + 'static,
{
    pub fn new(cache: HeightCache, render: RenderThread<I>) -> Self {
        Self { cache, render }
    }

    /// Returns the height to lay `item` out with at `width`.
    pub async fn resolve(&self, item: &I, width: f64) -> f64 {
        if let Some(height) = self.cache.get_height(item.item_id()) {
            return height;
        }

        match self.render.measure(item.clone(), width).await {
            Ok(raw) => {
                let height = classify_raw_height(raw);
                debug!(item_id = item.item_id(), raw, height, "measured on demand");
                self.cache.set_height(height, item.item_id());
                height
            }
            Err(e) => {
                warn!(item_id = item.item_id(), error = %e, "on-demand measurement failed");
                FALLBACK_HEIGHT
            }
        }
    }
}
