//! Drawable description of the strip handed back to the host.
//!
//! The engine does not draw anything; it describes tab chrome and the
//! indicator so the host framework can lay them out and paint them.

use serde::{Deserialize, Serialize};

use crate::config::{Color, StripConfig};

/// A tab as supplied by the host. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    /// Text shown in the tab.
    pub label: String,
    /// Badge count; a badge is drawn only when it is above zero.
    #[serde(default)]
    pub badge: Option<u32>,
    /// Badge colour overriding the strip-wide one.
    #[serde(default)]
    pub badge_color: Option<Color>,
}

impl TabDescriptor {
    /// Create a tab with just a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            badge: None,
            badge_color: None,
        }
    }

    /// Attach a badge count.
    pub fn with_badge(mut self, count: u32) -> Self {
        self.badge = Some(count);
        self
    }

    /// Attach a badge colour.
    pub fn with_badge_color(mut self, color: impl Into<Color>) -> Self {
        self.badge_color = Some(color.into());
        self
    }
}

/// Inputs of one render pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderProps {
    /// Index of the active tab.
    pub active_tab: usize,
    /// Tabs in display order.
    pub tabs: Vec<TabDescriptor>,
    /// Page progress at render time.
    pub progress: f64,
}

/// Badge bubble next to a tab label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeChrome {
    pub text: String,
    pub color: Color,
}

/// Chrome for a single tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabChrome {
    pub page: usize,
    pub label: String,
    pub active: bool,
    pub text_color: Color,
    /// Margin before the tab; the layout source reports rects including it.
    pub margin_left: f64,
    pub badge: Option<BadgeChrome>,
}

/// The underline view, positioned later through [`crate::IndicatorTransform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorChrome {
    pub color: Color,
    pub thickness: f64,
    pub bottom_offset: f64,
    /// Layout width of the indicator before scaling.
    pub base_width: f64,
}

/// Everything the host draws for the strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripFrame {
    pub background: Option<Color>,
    pub tabs: Vec<TabChrome>,
    /// Padding after the last tab inside the scroll content.
    pub trailing_padding: f64,
    /// Present once every tab has been measured.
    pub indicator: Option<IndicatorChrome>,
}

/// What a [`TabRenderer`] gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct TabContext<'a> {
    pub tab: &'a TabDescriptor,
    pub page: usize,
    pub active: bool,
    pub config: &'a StripConfig,
}

/// Produces the chrome for one tab. Replace it to customise tabs.
pub trait TabRenderer {
    fn render_tab(&self, cx: &TabContext<'_>) -> TabChrome;
}

/// Label coloured by activity plus an optional badge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTabRenderer;

impl TabRenderer for DefaultTabRenderer {
    fn render_tab(&self, cx: &TabContext<'_>) -> TabChrome {
        let config = cx.config;
        let text_color = if cx.active {
            config.active_text_color.clone()
        } else {
            config.inactive_text_color.clone()
        };

        let badge = cx.tab.badge.filter(|&count| count > 0).map(|count| BadgeChrome {
            text: count.to_string(),
            color: badge_color(cx.tab, config),
        });

        TabChrome {
            page: cx.page,
            label: cx.tab.label.clone(),
            active: cx.active,
            text_color,
            margin_left: config.tab_margin,
            badge,
        }
    }
}

/// Tab colour, then strip badge colour, then the active text colour.
pub fn badge_color(tab: &TabDescriptor, config: &StripConfig) -> Color {
    tab.badge_color
        .as_ref()
        .or(config.badge_color.as_ref())
        .unwrap_or(&config.active_text_color)
        .clone()
}
