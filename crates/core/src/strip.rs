//! The tab strip state machine.
//!
//! `TabStrip` owns every piece of per-instance state (registry, container
//! metrics, interpolation table, activation state) and turns host events into
//! [`Effects`]. It never talks to the host itself; [`Effects::apply`] does.

use tracing::{debug, warn};

use crate::config::{ScrollFollow, StripConfig};
use crate::evaluator::{self, IndicatorTransform};
use crate::geometry::Rect;
use crate::host::StripHost;
use crate::metrics::ContainerMetrics;
use crate::overflow::ViewportOverflowCorrector;
use crate::registry::{Completion, LayoutRegistry};
use crate::render::{
    DefaultTabRenderer, IndicatorChrome, RenderProps, StripFrame, TabContext, TabRenderer,
};
use crate::table::{InterpolationTable, TableParams};

/// Distance within which a scroll report counts as having reached a correction target.
pub const SETTLE_TOLERANCE: f64 = 0.5;

/// Commands for the host produced by one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Effects {
    /// New indicator transform.
    pub indicator: Option<IndicatorTransform>,
    /// Immediate, non-animated strip scroll target.
    pub scroll_to: Option<f64>,
}

impl Effects {
    /// No commands.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.indicator.is_none() && self.scroll_to.is_none()
    }

    /// Combine with later effects; later commands win.
    pub fn then(self, later: Effects) -> Self {
        Self {
            indicator: later.indicator.or(self.indicator),
            scroll_to: later.scroll_to.or(self.scroll_to),
        }
    }

    /// Issue the commands to the host.
    pub fn apply<H: StripHost + ?Sized>(self, host: &mut H) {
        if let Some(transform) = self.indicator {
            host.apply_indicator(transform);
        }
        if let Some(x) = self.scroll_to {
            host.scroll_to(x);
        }
    }
}

/// State used by the discrete overflow corrector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivationState {
    /// Index of the active tab.
    pub active_tab: usize,
    /// Last scroll offset reported by the strip.
    pub scroll_offset: f64,
    /// Whether the user is dragging the pager.
    pub dragging: bool,
    /// Target of a correction that has not landed yet.
    pub correction_target: Option<f64>,
    /// Activation changed mid-drag; correct once the drag ends.
    pub correction_deferred: bool,
}

/// Result of [`TabStrip::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateOutcome {
    /// Whether the props differ from the previous render.
    pub redraw: bool,
    /// Commands triggered by the update (activation change, reset).
    pub effects: Effects,
}

/// One mounted tab strip.
pub struct TabStrip {
    config: StripConfig,
    renderer: Box<dyn TabRenderer>,
    registry: LayoutRegistry,
    metrics: ContainerMetrics,
    table: Option<InterpolationTable>,
    activation: ActivationState,
    initial_setup_done: bool,
    last_props: Option<RenderProps>,
}

impl TabStrip {
    /// Create a strip expecting `tab_count` tabs with `active_tab` selected.
    pub fn new(config: StripConfig, tab_count: usize, active_tab: usize) -> Self {
        Self {
            config,
            renderer: Box::new(DefaultTabRenderer),
            registry: LayoutRegistry::new(tab_count),
            metrics: ContainerMetrics::new(),
            table: None,
            activation: ActivationState {
                active_tab,
                ..Default::default()
            },
            initial_setup_done: false,
            last_props: None,
        }
    }

    /// Replace the per-tab renderer.
    pub fn with_renderer(mut self, renderer: impl TabRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Strip configuration.
    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Measurement registry.
    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Container metrics.
    pub fn metrics(&self) -> &ContainerMetrics {
        &self.metrics
    }

    /// Current interpolation table, if built.
    pub fn table(&self) -> Option<&InterpolationTable> {
        self.table.as_ref()
    }

    /// Activation state.
    pub fn activation(&self) -> &ActivationState {
        &self.activation
    }

    /// Whether tables can be (re)built: all tabs measured and containers laid out.
    pub fn is_ready(&self) -> bool {
        self.registry.is_complete() && self.metrics.is_measured()
    }

    /// Change the number of tabs. A different count discards all measurements.
    pub fn set_tab_count(&mut self, tab_count: usize) -> bool {
        if tab_count == self.registry.tab_count() {
            return false;
        }
        self.registry.reset(tab_count);
        self.table = None;
        self.initial_setup_done = false;
        self.activation.correction_target = None;
        self.activation.correction_deferred = false;
        if tab_count > 0 && self.activation.active_tab >= tab_count {
            self.activation.active_tab = tab_count - 1;
        }
        true
    }

    /// A tab view reported its layout.
    ///
    /// `progress` is the current page progress, re-applied when the tables
    /// change under an already visible indicator.
    pub fn on_tab_layout(&mut self, page: usize, rect: Rect, progress: f64) -> Effects {
        match self.registry.record(page, rect) {
            Completion::Pending { measured, expected } => {
                debug!("Tab {} measured ({}/{})", page, measured, expected);
                Effects::none()
            }
            Completion::JustCompleted | Completion::Complete => self.refresh(progress),
        }
    }

    /// The strip viewport was laid out.
    pub fn on_viewport_layout(&mut self, rect: Rect, progress: f64) -> Effects {
        if !self.metrics.set_viewport(rect) {
            return Effects::none();
        }
        self.reclamp_correction();
        self.refresh(progress)
    }

    /// The scrollable content changed size.
    pub fn on_content_size(&mut self, width: f64, height: f64, progress: f64) -> Effects {
        if !self.metrics.set_scroll_content(width, height) {
            return Effects::none();
        }
        self.reclamp_correction();
        self.refresh(progress)
    }

    /// A new page-progress sample.
    pub fn on_progress(&mut self, value: f64) -> Effects {
        let frame = evaluator::evaluate(self.table.as_ref(), value);
        let follow = self.config.scroll_follow == ScrollFollow::Continuous;
        let scroll_to = if follow && self.activation.correction_target.is_none() {
            frame.scroll_offset
        } else {
            None
        };

        Effects {
            indicator: Some(frame.indicator),
            scroll_to,
        }
    }

    /// The strip reported its scroll position.
    pub fn on_scroll(&mut self, offset: f64) {
        self.activation.scroll_offset = offset;
        if let Some(target) = self.activation.correction_target {
            if (offset - target).abs() <= SETTLE_TOLERANCE {
                debug!("Scroll correction to {:.1} settled", target);
                self.activation.correction_target = None;
            }
        }
    }

    /// The pager started a drag gesture. Cancels any in-flight correction.
    pub fn begin_drag(&mut self) {
        self.activation.dragging = true;
        self.activation.correction_target = None;
    }

    /// The pager drag ended; runs a correction deferred during the drag.
    pub fn end_drag(&mut self) -> Effects {
        self.activation.dragging = false;
        if std::mem::take(&mut self.activation.correction_deferred) {
            self.correct_viewport()
        } else {
            Effects::none()
        }
    }

    /// The active tab changed (tap or settled swipe).
    pub fn on_active_tab_changed(&mut self, index: usize) -> Effects {
        if index >= self.registry.tab_count() {
            warn!(
                "Ignoring activation of tab {} (strip has {} tabs)",
                index,
                self.registry.tab_count()
            );
            return Effects::none();
        }
        if index == self.activation.active_tab {
            return Effects::none();
        }
        self.activation.active_tab = index;

        if self.activation.dragging {
            self.activation.correction_deferred = true;
            return Effects::none();
        }
        self.correct_viewport()
    }

    /// Consume new render props.
    pub fn update(&mut self, props: RenderProps) -> UpdateOutcome {
        if self.last_props.as_ref() == Some(&props) {
            return UpdateOutcome::default();
        }

        let mut effects = Effects::none();
        if self.set_tab_count(props.tabs.len()) {
            effects = effects.then(self.on_progress(props.progress));
        }
        let previous_active = self.last_props.as_ref().map(|p| p.active_tab);
        if previous_active.is_some_and(|active| active != props.active_tab) {
            effects = effects.then(self.on_active_tab_changed(props.active_tab));
        } else if previous_active.is_none() {
            self.activation.active_tab = props.active_tab;
        }

        self.last_props = Some(props);
        UpdateOutcome {
            redraw: true,
            effects,
        }
    }

    /// Describe what the host should draw for `props`.
    pub fn render(&self, props: &RenderProps) -> StripFrame {
        let tabs = props
            .tabs
            .iter()
            .enumerate()
            .map(|(page, tab)| {
                self.renderer.render_tab(&TabContext {
                    tab,
                    page,
                    active: page == props.active_tab,
                    config: &self.config,
                })
            })
            .collect();

        let indicator = self.registry.is_complete().then(|| IndicatorChrome {
            color: self.config.indicator.color.clone(),
            thickness: self.config.indicator.thickness,
            bottom_offset: self.config.indicator.bottom_offset,
            base_width: 1.0,
        });

        StripFrame {
            background: self.config.background_color.clone(),
            tabs,
            trailing_padding: self.config.tab_margin,
            indicator,
        }
    }

    /// Rebuild tables if ready and re-evaluate progress against them.
    fn refresh(&mut self, progress: f64) -> Effects {
        if !self.rebuild() {
            return Effects::none();
        }
        if !self.initial_setup_done {
            self.initial_setup_done = true;
            let active = self.activation.active_tab as f64;
            debug!("Initial indicator placement at tab {}", active);
            return self.on_progress(active);
        }
        self.on_progress(progress)
    }

    fn rebuild(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let params = TableParams::from(&self.config);
        match InterpolationTable::build(&self.registry, &self.metrics, &params) {
            Ok(table) => {
                debug!(
                    "Interpolation table rebuilt ({} tabs, viewport {:.1}, content {:.1})",
                    self.registry.tab_count(),
                    self.metrics.viewport_width(),
                    self.metrics.content_width()
                );
                self.table = Some(table);
            }
            Err(e) => warn!("Keeping previous interpolation table: {}", e),
        }
        self.table.is_some()
    }

    /// Keep an in-flight correction target reachable after the containers change.
    fn reclamp_correction(&mut self) {
        let Some(target) = self.activation.correction_target else {
            return;
        };
        if !self.metrics.is_measured() {
            self.activation.correction_target = None;
            return;
        }
        let clamped = target.clamp(0.0, self.metrics.max_scroll());
        if (self.activation.scroll_offset - clamped).abs() <= SETTLE_TOLERANCE {
            debug!("Scroll correction to {:.1} settled by relayout", clamped);
            self.activation.correction_target = None;
        } else {
            self.activation.correction_target = Some(clamped);
        }
    }

    fn correct_viewport(&mut self) -> Effects {
        if !self.metrics.is_measured() {
            return Effects::none();
        }
        let index = self.activation.active_tab;
        let Some(rect) = self.registry.get(index) else {
            return Effects::none();
        };
        let is_last = index + 1 == self.registry.tab_count();
        let corrector = ViewportOverflowCorrector::new(self.config.tab_margin);
        let Some(correction) = corrector.check(
            rect,
            is_last,
            self.activation.scroll_offset,
            self.metrics.viewport_width(),
        ) else {
            return Effects::none();
        };

        let target = correction.target.min(self.metrics.max_scroll());
        debug!(
            "Tab {} overflows {:?}, scrolling strip to {:.1}",
            index, correction.side, target
        );
        self.activation.correction_target = Some(target);
        Effects {
            indicator: None,
            scroll_to: Some(target),
        }
    }
}
