//! Measurement Module
//!
//! Traits for list items and the external layout measurer, plus the
//! classification step that turns a raw measurement into a storable height.

use serde::{Deserialize, Serialize};

// == Classification Constants ==
/// Stored when the measurer reports a non-positive or non-numeric height
pub const FALLBACK_HEIGHT: f64 = 50.0;

/// Raw heights at or above this value mean "content suppressed"
pub const SUPPRESSED_SENTINEL: f64 = 10_000.0;

/// Stored for suppressed content
pub const SUPPRESSED_HEIGHT: f64 = 1.0;

/// Largest height a real measurement is clamped to
pub const MAX_MEASURED_HEIGHT: f64 = 3000.0;

// == List Item ==
/// An item in a virtualized list, keyed by a stable string id.
pub trait ListItem {
    fn item_id(&self) -> &str;
}

// == Layout Measurer ==
/// Computes the rendered height of an item at a given width.
///
/// Implementations are driven only from the render thread and may keep
/// thread-affine state; see [`RenderThread`](crate::render_thread::RenderThread).
pub trait LayoutMeasurer<I> {
    /// Measures `item` at `width` with an unbounded height budget.
    fn measure(&mut self, item: &I, width: f64) -> f64;
}

impl<I, F> LayoutMeasurer<I> for F
where
    F: FnMut(&I, f64) -> f64,
{
    fn measure(&mut self, item: &I, width: f64) -> f64 {
        self(item, width)
    }
}

// == Classify Raw Height ==
/// Maps a raw measurement to the height that gets cached.
///
/// | raw                  | stored |
/// |----------------------|--------|
/// | `<= 0` or NaN        | 50.0   |
/// | `>= 10000`           | 1.0    |
/// | `> 3000`             | 3000.0 |
/// | otherwise            | raw    |
pub fn classify_raw_height(raw: f64) -> f64 {
    if raw.is_nan() || raw <= 0.0 {
        FALLBACK_HEIGHT
    } else if raw >= SUPPRESSED_SENTINEL {
        SUPPRESSED_HEIGHT
    } else if raw > MAX_MEASURED_HEIGHT {
        MAX_MEASURED_HEIGHT
    } else {
        raw
    }
}

// == Text Item ==
/// A plain text row, the item type served by the diagnostics binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub id: String,
    pub text: String,
    /// Hidden by content policy; measures as the suppression sentinel
    #[serde(default)]
    pub suppressed: bool,
}

impl TextItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            suppressed: false,
        }
    }

    pub fn suppressed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            suppressed: true,
        }
    }
}

impl ListItem for TextItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

// == Text Measurer ==
/// Fixed-pitch text layout: wraps text into lines of whole glyphs.
#[derive(Debug, Clone)]
pub struct TextMeasurer {
    pub glyph_width: f64,
    pub line_height: f64,
    pub horizontal_padding: f64,
    pub vertical_padding: f64,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self {
            glyph_width: 8.0,
            line_height: 20.0,
            horizontal_padding: 16.0,
            vertical_padding: 24.0,
        }
    }
}

impl LayoutMeasurer<TextItem> for TextMeasurer {
    fn measure(&mut self, item: &TextItem, width: f64) -> f64 {
        if item.suppressed {
            return SUPPRESSED_SENTINEL;
        }

        let glyphs = item.text.chars().count();
        let usable = width - 2.0 * self.horizontal_padding;
        if glyphs == 0 || usable < self.glyph_width {
            return 0.0;
        }

        let per_line = (usable / self.glyph_width).floor() as usize;
        let lines = glyphs.div_ceil(per_line);
        lines as f64 * self.line_height + self.vertical_padding
    }
}
