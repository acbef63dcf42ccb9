//! One-shot scroll correction keeping a newly activated tab inside the viewport.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Which viewport edge the active tab crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowSide {
    /// The tab extends past the trailing edge of the viewport.
    Right,
    /// The tab starts before the leading edge of the viewport.
    Left,
}

/// A scroll correction to issue once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub side: OverflowSide,
    /// Absolute scroll offset to move the strip to.
    pub target: f64,
}

/// Checks a tab against the visible part of the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportOverflowCorrector {
    margin: f64,
}

impl ViewportOverflowCorrector {
    /// Create a corrector using the strip's inter-tab margin.
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    /// Correction needed so that `tab` is visible, if any.
    ///
    /// On right overflow the margin is doubled unless `is_last`, so the next
    /// tab peeks into view.
    pub fn check(
        &self,
        tab: &Rect,
        is_last: bool,
        scroll_offset: f64,
        viewport_width: f64,
    ) -> Option<Correction> {
        let visible_right = scroll_offset + viewport_width;

        if tab.right() > visible_right {
            let overflow = tab.right() - viewport_width;
            let margins = if is_last { 1.0 } else { 2.0 };
            return Some(Correction {
                side: OverflowSide::Right,
                target: overflow + self.margin * margins,
            });
        }

        if tab.x < scroll_offset {
            return Some(Correction {
                side: OverflowSide::Left,
                target: (tab.x - self.margin).max(0.0),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(x: f64, width: f64) -> Rect {
        Rect::new(x, 0.0, width, 30.0)
    }

    #[test]
    fn test_visible_tab_needs_nothing() {
        let corrector = ViewportOverflowCorrector::new(20.0);
        assert_eq!(corrector.check(&tab(100.0, 80.0), false, 0.0, 300.0), None);
        assert_eq!(corrector.check(&tab(100.0, 80.0), false, 100.0, 300.0), None);
    }

    #[test]
    fn test_right_overflow_reveals_next_tab() {
        let corrector = ViewportOverflowCorrector::new(20.0);
        let correction = corrector.check(&tab(270.0, 90.0), false, 0.0, 300.0);
        // 360 - 300 = 60, plus two margins.
        assert_eq!(
            correction,
            Some(Correction {
                side: OverflowSide::Right,
                target: 100.0
            })
        );
    }

    #[test]
    fn test_right_overflow_last_tab_single_margin() {
        let corrector = ViewportOverflowCorrector::new(20.0);
        let correction = corrector.check(&tab(270.0, 90.0), true, 0.0, 300.0);
        assert_eq!(correction.map(|c| c.target), Some(80.0));
    }

    #[test]
    fn test_left_overflow() {
        let corrector = ViewportOverflowCorrector::new(20.0);
        let correction = corrector.check(&tab(100.0, 80.0), false, 150.0, 300.0);
        assert_eq!(
            correction,
            Some(Correction {
                side: OverflowSide::Left,
                target: 80.0
            })
        );
    }

    #[test]
    fn test_left_overflow_never_negative() {
        let corrector = ViewportOverflowCorrector::new(20.0);
        let correction = corrector.check(&tab(10.0, 80.0), false, 50.0, 300.0);
        assert_eq!(correction.map(|c| c.target), Some(0.0));
    }
}
