//! Interpolation tables keyed by page index.
//!
//! From the measured tabs and the container metrics three piecewise-linear
//! functions of page progress are built:
//! - `left(page)`: the indicator's x-offset
//! - `width(page)`: the indicator's width
//! - `scroll_offset(page)`: the strip scroll position keeping that tab in view
//!
//! Tables are always rebuilt from scratch and depend only on the set of
//! recorded rectangles, never on the order in which they arrived.

use serde::Serialize;
use thiserror::Error;

use crate::config::StripConfig;
use crate::interpolate::{Interpolation, InterpolationError};
use crate::metrics::ContainerMetrics;
use crate::registry::LayoutRegistry;

/// Errors that can occur while building a table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("Tab measurement is incomplete ({measured} of {expected} tabs)")]
    IncompleteMeasurement { measured: usize, expected: usize },

    #[error("Strip viewport or scroll content has not been laid out")]
    ContainerNotMeasured,

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Tunables for the scroll-offset derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableParams {
    /// Fixed margin between tabs.
    pub margin: f64,
    /// Margin multiplier for interior tabs near the trailing edge.
    pub tail_margin_factor: f64,
    /// Output of the synthetic `-1` domain point (negated).
    pub overscroll_lead: f64,
}

impl Default for TableParams {
    fn default() -> Self {
        Self::from(&StripConfig::default())
    }
}

impl From<&StripConfig> for TableParams {
    fn from(config: &StripConfig) -> Self {
        Self {
            margin: config.tab_margin,
            tail_margin_factor: config.tail_margin_factor,
            overscroll_lead: config.overscroll_lead,
        }
    }
}

/// The three page-indexed functions driving the indicator and the strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolationTable {
    pub left: Interpolation,
    pub width: Interpolation,
    pub scroll_offset: Interpolation,
}

impl InterpolationTable {
    /// Build the table from a complete registry and measured containers.
    pub fn build(
        registry: &LayoutRegistry,
        metrics: &ContainerMetrics,
        params: &TableParams,
    ) -> Result<Self, TableError> {
        if !registry.is_complete() {
            return Err(TableError::IncompleteMeasurement {
                measured: registry.measured(),
                expected: registry.tab_count(),
            });
        }
        if !metrics.is_measured() {
            return Err(TableError::ContainerNotMeasured);
        }

        let mut pages = Vec::with_capacity(registry.measured().max(2));
        let mut lefts = Vec::with_capacity(pages.capacity());
        let mut widths = Vec::with_capacity(pages.capacity());
        for (page, rect) in registry.iter() {
            pages.push(page as f64);
            lefts.push(rect.x);
            widths.push(rect.width);
        }

        let scroll_offset = Self::scroll_function(&lefts, &widths, metrics, params)?;

        // A single tab still needs a two-point domain; the indicator collapses
        // towards zero beyond page 0.
        if pages.len() < 2 {
            pages.push(1.0);
            lefts.push(0.0);
            widths.push(0.0);
        }

        Ok(Self {
            left: Interpolation::clamped(pages.clone(), lefts)?,
            width: Interpolation::clamped(pages, widths)?,
            scroll_offset,
        })
    }

    fn scroll_function(
        lefts: &[f64],
        widths: &[f64],
        metrics: &ContainerMetrics,
        params: &TableParams,
    ) -> Result<Interpolation, InterpolationError> {
        let lead = -params.overscroll_lead;

        if metrics.fits_viewport() {
            return Interpolation::clamped(vec![-1.0, 0.0], vec![lead, 0.0]);
        }

        let offsets = scroll_offsets(lefts, widths, metrics, params);
        let mut input = vec![-1.0];
        let mut output = vec![lead];
        input.extend((0..offsets.len()).map(|page| page as f64));
        output.extend(offsets);
        if input.len() < 3 {
            input.push(1.0);
            output.push(0.0);
        }

        Interpolation::clamped(input, output)
    }
}

/// Per-page scroll offsets; page 0 is always at offset 0.
fn scroll_offsets(
    lefts: &[f64],
    widths: &[f64],
    metrics: &ContainerMetrics,
    params: &TableParams,
) -> Vec<f64> {
    let viewport = metrics.viewport_width();
    let content = metrics.content_width();
    let max_scroll = metrics.max_scroll();
    let margin = params.margin;
    let last = lefts.len().saturating_sub(1);

    let mut offsets = Vec::with_capacity(lefts.len());
    if lefts.is_empty() {
        return offsets;
    }
    offsets.push(0.0);

    for i in 1..lefts.len() {
        let left = lefts[i];
        let width = widths[i];
        let next_width = widths.get(i + 1).copied().unwrap_or(0.0);

        let offset = if left + width + next_width + 2.0 * margin >= content {
            if i == last {
                // Pin the trailing edge of the tab to the trailing edge of the viewport.
                left - (viewport - (width + margin))
            } else {
                left - (viewport - (width + next_width + params.tail_margin_factor * margin))
            }
        } else {
            let centered =
                left - (viewport - (width + margin) + (next_width + 2.0 * margin)) / 2.0;
            centered.max(0.0)
        };

        offsets.push(offset.clamp(0.0, max_scroll));
    }

    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn registry_with(tabs: &[(f64, f64)]) -> LayoutRegistry {
        let mut registry = LayoutRegistry::new(tabs.len());
        for (page, &(x, width)) in tabs.iter().enumerate() {
            registry.record(page, Rect::new(x, 0.0, width, 30.0));
        }
        registry
    }

    fn metrics_with(viewport: f64, content: f64) -> ContainerMetrics {
        let mut metrics = ContainerMetrics::new();
        metrics.set_viewport(Rect::new(0.0, 0.0, viewport, 48.0));
        metrics.set_scroll_content(content, 48.0);
        metrics
    }

    #[test]
    fn test_three_tab_scenario() {
        let registry = registry_with(&[(0.0, 80.0), (100.0, 150.0), (270.0, 90.0)]);
        let metrics = metrics_with(300.0, 400.0);
        let table =
            InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

        assert_eq!(table.left.output(), &[0.0, 100.0, 270.0]);
        assert_eq!(table.width.output(), &[80.0, 150.0, 90.0]);

        // Page 1 is interior: 100 - (300 - 170 + 130) / 2 = -30, clamped to 0.
        assert_eq!(table.scroll_offset.eval(1.0), 0.0);
        // Page 2 is last: 270 - (300 - (90 + 20)) = 80.
        assert_eq!(table.scroll_offset.eval(2.0), 80.0);
        assert_eq!(table.scroll_offset.eval(0.0), 0.0);
    }

    #[test]
    fn test_centering_interior_tab() {
        // Wide content so that page 2 has room on both sides.
        let registry = registry_with(&[
            (20.0, 100.0),
            (140.0, 100.0),
            (260.0, 100.0),
            (380.0, 100.0),
            (500.0, 100.0),
        ]);
        let metrics = metrics_with(300.0, 620.0);
        let table =
            InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

        // 260 - (300 - 120 + 140) / 2 = 100
        assert_eq!(table.scroll_offset.eval(2.0), 100.0);
    }

    #[test]
    fn test_interior_tail_tab_uses_margin_factor() {
        let registry = registry_with(&[
            (20.0, 100.0),
            (140.0, 100.0),
            (260.0, 100.0),
            (380.0, 100.0),
        ]);
        let metrics = metrics_with(300.0, 500.0);
        let params = TableParams::default();
        let table = InterpolationTable::build(&registry, &metrics, &params).unwrap();

        // Page 2: 260 + 100 + 100 + 40 >= 500, not last.
        // 260 - (300 - (100 + 100 + 1.3 * 20)) = 186
        let expected = 260.0 - (300.0 - (100.0 + 100.0 + 1.3 * 20.0));
        assert!((table.scroll_offset.eval(2.0) - expected).abs() < 1e-9);
        // Last tab: 380 - (300 - 120) = 200 = max scroll.
        assert_eq!(table.scroll_offset.eval(3.0), 200.0);
    }

    #[test]
    fn test_fitting_content_degenerates_to_clamp_pair() {
        for count in 1..5 {
            let tabs: Vec<(f64, f64)> = (0..count).map(|i| (i as f64 * 90.0, 70.0)).collect();
            let registry = registry_with(&tabs);
            let metrics = metrics_with(400.0, 380.0);
            let table =
                InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

            assert_eq!(table.scroll_offset.input(), &[-1.0, 0.0]);
            assert_eq!(table.scroll_offset.output(), &[-40.0, 0.0]);
        }
    }

    #[test]
    fn test_single_tab_gets_synthetic_point() {
        let registry = registry_with(&[(20.0, 120.0)]);
        let metrics = metrics_with(300.0, 160.0);
        let table =
            InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

        assert_eq!(table.width.input(), &[0.0, 1.0]);
        assert_eq!(table.width.eval(0.0), 120.0);
        assert_eq!(table.width.eval(1.0), 0.0);
        assert_eq!(table.width.eval(4.0), 0.0);
        assert_eq!(table.left.eval(1.0), 0.0);
    }

    #[test]
    fn test_single_wide_tab_scroll_domain() {
        let registry = registry_with(&[(20.0, 500.0)]);
        let metrics = metrics_with(300.0, 540.0);
        let table =
            InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

        assert_eq!(table.scroll_offset.input(), &[-1.0, 0.0, 1.0]);
        assert_eq!(table.scroll_offset.eval(0.0), 0.0);
        assert_eq!(table.scroll_offset.eval(-1.0), -40.0);
    }

    #[test]
    fn test_scroll_never_exceeds_range() {
        let registry = registry_with(&[(20.0, 60.0), (100.0, 60.0), (180.0, 300.0)]);
        let metrics = metrics_with(200.0, 500.0);
        let table =
            InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap();

        for step in 0..40 {
            let value = step as f64 * 0.25 - 2.0;
            assert!(table.scroll_offset.eval(value) <= metrics.max_scroll());
        }
        assert_eq!(table.scroll_offset.eval(0.0), 0.0);
    }

    #[test]
    fn test_order_independent() {
        let tabs = [(0.0, 80.0), (100.0, 150.0), (270.0, 90.0)];
        let mut forward = LayoutRegistry::new(3);
        let mut backward = LayoutRegistry::new(3);
        for (page, &(x, w)) in tabs.iter().enumerate() {
            forward.record(page, Rect::new(x, 0.0, w, 30.0));
        }
        for (page, &(x, w)) in tabs.iter().enumerate().rev() {
            backward.record(page, Rect::new(x, 0.0, w, 30.0));
        }
        let metrics = metrics_with(300.0, 400.0);
        let params = TableParams::default();

        assert_eq!(
            InterpolationTable::build(&forward, &metrics, &params).unwrap(),
            InterpolationTable::build(&backward, &metrics, &params).unwrap()
        );
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let registry = registry_with(&[(0.0, 80.0), (100.0, 150.0), (270.0, 90.0)]);
        let metrics = metrics_with(300.0, 400.0);
        let params = TableParams::default();

        let a = InterpolationTable::build(&registry, &metrics, &params).unwrap();
        let b = InterpolationTable::build(&registry, &metrics, &params).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_not_ready() {
        let mut registry = LayoutRegistry::new(2);
        registry.record(0, Rect::new(0.0, 0.0, 80.0, 30.0));
        let metrics = metrics_with(300.0, 400.0);
        assert_eq!(
            InterpolationTable::build(&registry, &metrics, &TableParams::default()),
            Err(TableError::IncompleteMeasurement {
                measured: 1,
                expected: 2
            })
        );

        registry.record(1, Rect::new(100.0, 0.0, 80.0, 30.0));
        assert_eq!(
            InterpolationTable::build(&registry, &ContainerMetrics::new(), &TableParams::default()),
            Err(TableError::ContainerNotMeasured)
        );
    }
}
