//! Progress evaluation: page progress in, indicator transform and strip offset out.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::table::InterpolationTable;

/// Translate/scale applied to the unit-wide underline indicator.
///
/// The indicator's base width is one layout unit, so `scale_x` is directly the
/// rendered width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorTransform {
    pub translate_x: f64,
    pub scale_x: f64,
}

impl IndicatorTransform {
    /// Zero translate and zero scale; the indicator is invisible.
    pub const NEUTRAL: Self = Self {
        translate_x: 0.0,
        scale_x: 0.0,
    };

    /// Create a transform.
    pub fn new(translate_x: f64, scale_x: f64) -> Self {
        Self {
            translate_x,
            scale_x,
        }
    }

    /// Whether the transform hides the indicator.
    pub fn is_neutral(&self) -> bool {
        self.scale_x == 0.0 && self.translate_x == 0.0
    }

    /// Row-major 4x4 matrix (row-vector convention) for hosts that transform
    /// about the view's centre.
    ///
    /// Scaling happens about the indicator's left edge, so the unit-wide view
    /// laid out at `[0, 1]` ends up covering `[translate_x, translate_x + scale_x]`.
    pub fn to_matrix(&self) -> [f64; 16] {
        let s = self.scale_x;
        let tx = self.translate_x + 0.5 * (s - 1.0);
        [
            s, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            tx, 0.0, 0.0, 1.0,
        ]
    }
}

/// Output of one progress sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressFrame {
    /// Indicator placement for this sample.
    pub indicator: IndicatorTransform,
    /// Strip scroll target, absent until tables exist.
    pub scroll_offset: Option<f64>,
}

/// Evaluate the tables at `value`.
///
/// Without a table the result is the neutral transform and no scroll target.
pub fn evaluate(table: Option<&InterpolationTable>, value: f64) -> ProgressFrame {
    let Some(table) = table else {
        trace!("No interpolation table yet, progress {} ignored", value);
        return ProgressFrame::default();
    };

    let frame = ProgressFrame {
        indicator: IndicatorTransform::new(table.left.eval(value), table.width.eval(value)),
        scroll_offset: Some(table.scroll_offset.eval(value)),
    };
    trace!(
        "progress={:.3} -> translate_x={:.1} scale_x={:.1} scroll={:?}",
        value,
        frame.indicator.translate_x,
        frame.indicator.scale_x,
        frame.scroll_offset
    );
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::metrics::ContainerMetrics;
    use crate::registry::LayoutRegistry;
    use crate::table::TableParams;

    fn three_tab_table() -> InterpolationTable {
        let mut registry = LayoutRegistry::new(3);
        registry.record(0, Rect::new(0.0, 0.0, 80.0, 30.0));
        registry.record(1, Rect::new(100.0, 0.0, 150.0, 30.0));
        registry.record(2, Rect::new(270.0, 0.0, 90.0, 30.0));
        let mut metrics = ContainerMetrics::new();
        metrics.set_viewport(Rect::new(0.0, 0.0, 300.0, 48.0));
        metrics.set_scroll_content(400.0, 48.0);
        InterpolationTable::build(&registry, &metrics, &TableParams::default()).unwrap()
    }

    #[test]
    fn test_missing_table_is_neutral() {
        let frame = evaluate(None, 1.5);
        assert!(frame.indicator.is_neutral());
        assert_eq!(frame.scroll_offset, None);
    }

    #[test]
    fn test_integral_progress() {
        let table = three_tab_table();
        let frame = evaluate(Some(&table), 1.0);
        assert_eq!(frame.indicator, IndicatorTransform::new(100.0, 150.0));
        assert_eq!(frame.scroll_offset, Some(0.0));
    }

    #[test]
    fn test_mid_swipe_progress() {
        let table = three_tab_table();
        let frame = evaluate(Some(&table), 1.5);
        assert_eq!(frame.indicator, IndicatorTransform::new(185.0, 120.0));
        assert_eq!(frame.scroll_offset, Some(40.0));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let table = three_tab_table();
        let frame = evaluate(Some(&table), 2.7);
        assert_eq!(frame.indicator, IndicatorTransform::new(270.0, 90.0));
        assert_eq!(frame.scroll_offset, Some(80.0));

        let frame = evaluate(Some(&table), -0.5);
        assert_eq!(frame.indicator, IndicatorTransform::new(0.0, 80.0));
        assert_eq!(frame.scroll_offset, Some(-20.0));
    }

    #[test]
    fn test_nan_progress_rests_on_first_tab() {
        let table = three_tab_table();
        let frame = evaluate(Some(&table), f64::NAN);
        assert_eq!(frame.indicator, IndicatorTransform::new(0.0, 80.0));
        assert_eq!(frame.scroll_offset, Some(0.0));
    }

    #[test]
    fn test_matrix_spans_indicator() {
        let transform = IndicatorTransform::new(100.0, 150.0);
        let m = transform.to_matrix();
        // Map the centred x-coordinates of the unit view's edges.
        let project = |c: f64| c * m[0] + m[12] + 0.5;
        assert!((project(-0.5) - 100.0).abs() < 1e-9);
        assert!((project(0.5) - 250.0).abs() < 1e-9);
        assert_eq!(m[5], 1.0);
        assert_eq!(m[15], 1.0);
    }
}
