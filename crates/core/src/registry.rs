//! Per-tab measurement registry.
//!
//! Tab views report their rectangles asynchronously and in any order. The
//! registry keeps the latest rectangle per page and reports when every tab
//! has been measured at least once.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::geometry::Rect;

/// Measurement progress reported by [`LayoutRegistry::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Some tabs have not reported a layout yet.
    Pending { measured: usize, expected: usize },
    /// This record was the one that completed measurement.
    JustCompleted,
    /// Measurement was already complete (a re-layout of a known tab).
    Complete,
}

impl Completion {
    /// Whether every tab has a recorded rectangle.
    pub fn is_complete(&self) -> bool {
        !matches!(self, Completion::Pending { .. })
    }
}

/// Mapping from page index to its most recent measured rectangle.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    tab_count: usize,
    rects: BTreeMap<usize, Rect>,
}

impl LayoutRegistry {
    /// Create an empty registry expecting `tab_count` tabs.
    pub fn new(tab_count: usize) -> Self {
        Self {
            tab_count,
            rects: BTreeMap::new(),
        }
    }

    /// Number of tabs the registry expects.
    pub fn tab_count(&self) -> usize {
        self.tab_count
    }

    /// Number of distinct pages measured so far.
    pub fn measured(&self) -> usize {
        self.rects.len()
    }

    /// Whether every tab has a recorded rectangle.
    pub fn is_complete(&self) -> bool {
        self.tab_count > 0 && self.rects.len() == self.tab_count
    }

    /// Record the rectangle for `page`, replacing any earlier measurement.
    ///
    /// Pages outside `0..tab_count` are dropped; they cannot come from a
    /// well-behaved layout source.
    pub fn record(&mut self, page: usize, rect: Rect) -> Completion {
        if page >= self.tab_count {
            warn!(
                "Ignoring layout for page {} (strip has {} tabs)",
                page, self.tab_count
            );
            return self.status();
        }

        let was_complete = self.is_complete();
        self.rects.insert(page, rect);

        if self.is_complete() && !was_complete {
            debug!("All {} tabs measured", self.tab_count);
            Completion::JustCompleted
        } else {
            self.status()
        }
    }

    /// Current completion status without recording anything.
    pub fn status(&self) -> Completion {
        if self.is_complete() {
            Completion::Complete
        } else {
            Completion::Pending {
                measured: self.rects.len(),
                expected: self.tab_count,
            }
        }
    }

    /// Drop every measurement and start over for a new tab count.
    pub fn reset(&mut self, tab_count: usize) {
        debug!(
            "Resetting layout registry ({} -> {} tabs)",
            self.tab_count, tab_count
        );
        self.tab_count = tab_count;
        self.rects.clear();
    }

    /// Rectangle recorded for `page`, if any.
    pub fn get(&self, page: usize) -> Option<&Rect> {
        self.rects.get(&page)
    }

    /// Recorded rectangles in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Rect)> {
        self.rects.iter().map(|(&page, rect)| (page, rect))
    }
}
