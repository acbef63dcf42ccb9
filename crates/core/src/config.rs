//! Configuration surface of the strip (values only, no file handling).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A colour as understood by the host framework (`"navy"`, `"#53ac49"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wrap a host colour string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw colour string handed to the host.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How the strip's own scroll position follows the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollFollow {
    /// Scroll continuously with the page progress.
    #[default]
    Continuous,
    /// Only correct the scroll position when the active tab leaves the viewport.
    ActiveTabOnly,
}

/// Appearance of the underline indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorStyle {
    /// Indicator colour.
    pub color: Color,
    /// Indicator thickness in layout units.
    pub thickness: f64,
    /// Distance between the indicator and the bottom of the strip.
    pub bottom_offset: f64,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            color: Color::new("navy"),
            thickness: 2.0,
            bottom_offset: 0.0,
        }
    }
}

/// Strip configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Underline indicator appearance.
    pub indicator: IndicatorStyle,
    /// Margin placed before every tab (and after the last one).
    pub tab_margin: f64,
    /// Label colour of the active tab.
    pub active_text_color: Color,
    /// Label colour of inactive tabs.
    pub inactive_text_color: Color,
    /// Badge colour used when a tab does not set its own.
    pub badge_color: Option<Color>,
    /// Strip background.
    pub background_color: Option<Color>,
    /// Margin multiplier for interior tabs near the trailing edge of the content.
    ///
    /// Tuned by eye: at 2.0 the scroll offset coincides with the last tab's
    /// and the strip bounces while swiping.
    pub tail_margin_factor: f64,
    /// How far the strip may be pulled left when progress drops below page 0.
    pub overscroll_lead: f64,
    /// Continuous or discrete strip scrolling.
    pub scroll_follow: ScrollFollow,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            indicator: IndicatorStyle::default(),
            tab_margin: 20.0,
            active_text_color: Color::new("navy"),
            inactive_text_color: Color::new("black"),
            badge_color: None,
            background_color: None,
            tail_margin_factor: 1.3,
            overscroll_lead: 40.0,
            scroll_follow: ScrollFollow::default(),
        }
    }
}
