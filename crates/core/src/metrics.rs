//! Container rectangles the interpolation needs besides the tabs themselves.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// The visible strip viewport and the full scrollable content extent.
///
/// Both start as zero rectangles and are updated independently by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerMetrics {
    /// Visible part of the tab strip.
    pub viewport: Rect,
    /// Total scrollable content of the strip.
    pub scroll_content: Rect,
}

impl ContainerMetrics {
    /// Create metrics with both rectangles zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new layout of the strip viewport.
    ///
    /// Returns `true` if the stored rectangle changed.
    pub fn set_viewport(&mut self, rect: Rect) -> bool {
        let changed = self.viewport != rect;
        self.viewport = rect;
        changed
    }

    /// Record a new scrollable content size.
    ///
    /// Returns `true` if the stored rectangle changed.
    pub fn set_scroll_content(&mut self, width: f64, height: f64) -> bool {
        let rect = Rect::from_size(width, height);
        let changed = self.scroll_content != rect;
        self.scroll_content = rect;
        changed
    }

    /// Width of the visible viewport.
    pub fn viewport_width(&self) -> f64 {
        self.viewport.width
    }

    /// Width of the scrollable content.
    pub fn content_width(&self) -> f64 {
        self.scroll_content.width
    }

    /// Whether both rectangles have been laid out with a nonzero width.
    pub fn is_measured(&self) -> bool {
        self.viewport.has_width() && self.scroll_content.has_width()
    }

    /// Whether the content fits the viewport, leaving nothing to scroll.
    pub fn fits_viewport(&self) -> bool {
        self.content_width() <= self.viewport_width()
    }

    /// Largest scroll offset that still keeps content under the viewport.
    pub fn max_scroll(&self) -> f64 {
        (self.content_width() - self.viewport_width()).max(0.0)
    }
}
