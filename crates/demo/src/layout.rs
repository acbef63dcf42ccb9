//! Simulated host layout pass.
//!
//! Tabs sit in a row, each preceded by the strip margin, with one more
//! margin of trailing padding after the last tab.

use serde::Serialize;
use tabstrip_core::{Rect, TabDescriptor};

use crate::config::DemoConfig;

/// Rectangles a host would report after laying the strip out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedLayout {
    /// Tab rectangles in page order.
    pub tabs: Vec<Rect>,
    /// Visible strip.
    pub viewport: Rect,
    /// Scrollable content.
    pub content: Rect,
}

impl SimulatedLayout {
    /// Lay out tabs of the given widths.
    pub fn from_widths(widths: &[f64], margin: f64, viewport_width: f64, height: f64) -> Self {
        let mut tabs = Vec::with_capacity(widths.len());
        let mut left = 0.0;
        for &width in widths {
            left += margin;
            tabs.push(Rect::new(left, 0.0, width, height));
            left += width;
        }

        Self {
            tabs,
            viewport: Rect::new(0.0, 0.0, viewport_width, height),
            content: Rect::new(0.0, 0.0, left + margin, height),
        }
    }

    /// Lay out labelled tabs using the demo's text metrics.
    pub fn from_tabs(tabs: &[TabDescriptor], margin: f64, demo: &DemoConfig) -> Self {
        let widths: Vec<f64> = tabs.iter().map(|tab| tab_width(tab, demo)).collect();
        Self::from_widths(&widths, margin, demo.viewport_width, demo.tab_height)
    }

    /// Tab count.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Whether there are no tabs.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// Width of one tab: its label plus a badge bubble when one is shown.
pub fn tab_width(tab: &TabDescriptor, demo: &DemoConfig) -> f64 {
    let label = tab.label.chars().count() as f64 * demo.glyph_width;
    match tab.badge {
        Some(count) if count > 0 => label + demo.badge_width,
        _ => label,
    }
}

/// A fixed permutation of `0..n` that reports pages out of order.
///
/// Odd pages first, then even pages, each half reversed.
pub fn report_order(n: usize) -> Vec<usize> {
    let odd = (0..n).filter(|p| p % 2 == 1).rev();
    let even = (0..n).filter(|p| p % 2 == 0).rev();
    odd.chain(even).collect()
}
