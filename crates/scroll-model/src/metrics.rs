//! Viewport readings and clamping.
//!
//! Browsers let the scroll offset briefly leave the document bounds at the
//! edges (rubber-banding). Every reading is clamped to `[0, y_max]` before
//! it reaches the watcher.

use serde::{Deserialize, Serialize};

/// One reading of the viewport's scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Scroll offset as reported by the platform, possibly out of range.
    pub raw_y: f64,
    /// Viewport (window inner) height.
    pub viewport_height: f64,
    /// Full document height.
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(raw_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            raw_y,
            viewport_height,
            document_height,
        }
    }

    /// Maximum scrollable offset. Never negative, even for documents shorter
    /// than the viewport.
    pub fn y_max(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Scroll offset clamped to `[0, y_max]`. NaN reads as the top.
    pub fn clamped_y(&self) -> f64 {
        let y = if self.raw_y.is_nan() { 0.0 } else { self.raw_y };
        y.clamp(0.0, self.y_max())
    }

    /// Bottom edge of the visible area for a clamped offset.
    pub fn y_bottom(&self) -> f64 {
        self.clamped_y() + self.viewport_height
    }
}
