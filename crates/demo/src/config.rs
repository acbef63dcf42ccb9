//! Configuration management for the tabstrip demo.
//!
//! Configuration is loaded from TOML files in the following locations (in order):
//! 1. The platform config dir (`%APPDATA%/tabstrip/config.toml`, ...)
//! 2. `~/.config/tabstrip/config.toml` (Unix-style fallback)
//! 3. `./config.toml` (current directory, for development)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tabstrip_core::{StripConfig, TabDescriptor};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strip appearance and behavior.
    pub strip: StripConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Simulated host configuration.
    pub demo: DemoConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The simulated host: tabs, measurement model and animation pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Tabs shown in the strip.
    #[serde(default = "default_tabs")]
    pub tabs: Vec<TabDescriptor>,

    /// Width of the visible strip.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    /// Height of every tab.
    #[serde(default = "default_tab_height")]
    pub tab_height: f64,

    /// Width of one label glyph in the simulated text layout.
    #[serde(default = "default_glyph_width")]
    pub glyph_width: f64,

    /// Extra width taken by a visible badge bubble.
    #[serde(default = "default_badge_width")]
    pub badge_width: f64,

    /// Interval between progress samples in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Duration of one page swipe in milliseconds.
    #[serde(default = "default_swipe_ms")]
    pub swipe_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tabs: default_tabs(),
            viewport_width: default_viewport_width(),
            tab_height: default_tab_height(),
            glyph_width: default_glyph_width(),
            badge_width: default_badge_width(),
            tick_ms: default_tick_ms(),
            swipe_ms: default_swipe_ms(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_tabs() -> Vec<TabDescriptor> {
    vec![
        TabDescriptor::new("Page #1"),
        TabDescriptor::new("Page #2 aka Long!").with_badge(3),
        TabDescriptor::new("Page #3"),
        TabDescriptor::new("Page #4 aka Page"),
        TabDescriptor::new("Page #5"),
    ]
}

fn default_viewport_width() -> f64 {
    320.0
}

fn default_tab_height() -> f64 {
    30.0
}

fn default_glyph_width() -> f64 {
    8.0
}

fn default_badge_width() -> f64 {
    22.0
}

fn default_tick_ms() -> u64 {
    16
}

fn default_swipe_ms() -> u64 {
    250
}

/// A problem found (and fixed) while validating the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What was wrong and what was used instead.
    pub message: String,
}

impl ConfigWarning {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Config {
    /// Load configuration from standard locations.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self> {
        let paths = config_paths();

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Clamp nonsensical values, reporting what was changed.
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let defaults = StripConfig::default();

        if !(self.strip.tab_margin >= 0.0) {
            warnings.push(ConfigWarning::new(
                "strip.tab_margin",
                format!("{} is not a valid margin, using 0", self.strip.tab_margin),
            ));
            self.strip.tab_margin = 0.0;
        }
        if !(self.strip.indicator.thickness >= 0.0) {
            warnings.push(ConfigWarning::new(
                "strip.indicator.thickness",
                format!(
                    "{} is not a valid thickness, using {}",
                    self.strip.indicator.thickness, defaults.indicator.thickness
                ),
            ));
            self.strip.indicator.thickness = defaults.indicator.thickness;
        }
        if !(self.strip.tail_margin_factor > 0.0) {
            warnings.push(ConfigWarning::new(
                "strip.tail_margin_factor",
                format!(
                    "{} must be positive, using {}",
                    self.strip.tail_margin_factor, defaults.tail_margin_factor
                ),
            ));
            self.strip.tail_margin_factor = defaults.tail_margin_factor;
        }
        if !(self.strip.overscroll_lead >= 0.0) {
            warnings.push(ConfigWarning::new(
                "strip.overscroll_lead",
                format!(
                    "{} must not be negative, using {}",
                    self.strip.overscroll_lead, defaults.overscroll_lead
                ),
            ));
            self.strip.overscroll_lead = defaults.overscroll_lead;
        }
        if !(self.demo.viewport_width > 0.0) {
            warnings.push(ConfigWarning::new(
                "demo.viewport_width",
                format!(
                    "{} must be positive, using {}",
                    self.demo.viewport_width,
                    default_viewport_width()
                ),
            ));
            self.demo.viewport_width = default_viewport_width();
        }
        if self.demo.tabs.is_empty() {
            warnings.push(ConfigWarning::new(
                "demo.tabs",
                "no tabs configured, using the default five pages",
            ));
            self.demo.tabs = default_tabs();
        }
        if self.demo.tick_ms == 0 {
            warnings.push(ConfigWarning::new(
                "demo.tick_ms",
                format!("0 is too fast, using {}", default_tick_ms()),
            ));
            self.demo.tick_ms = default_tick_ms();
        }
        if self.demo.swipe_ms < self.demo.tick_ms {
            warnings.push(ConfigWarning::new(
                "demo.swipe_ms",
                format!("shorter than one tick, using {}", self.demo.tick_ms),
            ));
            self.demo.swipe_ms = self.demo.tick_ms;
        }

        warnings
    }
}

/// Get all possible config file paths in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(proj_dirs) = ProjectDirs::from("com", "tabstrip", "tabstrip") {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }

    if let Some(home) = dirs_home() {
        paths.push(home.join(".config").join("tabstrip").join("config.toml"));
    }

    paths.push(PathBuf::from("config.toml"));

    paths
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstrip_core::ScrollFollow;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strip.tab_margin, 20.0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.demo.tabs.len(), 5);
        assert_eq!(config.demo.tabs[1].badge, Some(3));
        assert_eq!(config.demo.tick_ms, 16);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.strip, config.strip);
        assert_eq!(parsed.demo.tabs, config.demo.tabs);
    }

    #[test]
    fn test_config_partial_parse() {
        let toml_str = r##"
            [strip]
            tab_margin = 12.0
            scroll_follow = "active_tab_only"

            [strip.indicator]
            color = "#53ac49"
        "##;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.strip.tab_margin, 12.0);
        assert_eq!(config.strip.scroll_follow, ScrollFollow::ActiveTabOnly);
        assert_eq!(config.strip.indicator.color.as_str(), "#53ac49");
        assert_eq!(config.strip.indicator.thickness, 2.0); // default
        assert_eq!(config.demo.viewport_width, 320.0); // default
    }

    #[test]
    fn test_demo_tabs_parse() {
        let toml_str = r#"
            [[demo.tabs]]
            label = "Inbox"
            badge = 12
            badge_color = "red"

            [[demo.tabs]]
            label = "Archive"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.demo.tabs.len(), 2);
        assert_eq!(config.demo.tabs[0].badge, Some(12));
        assert_eq!(
            config.demo.tabs[0].badge_color.as_ref().map(|c| c.as_str()),
            Some("red")
        );
        assert_eq!(config.demo.tabs[1].badge, None);
    }

    #[test]
    fn test_validate_default_is_clean() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_clamps_bad_values() {
        let mut config = Config::default();
        config.strip.tab_margin = -5.0;
        config.strip.tail_margin_factor = 0.0;
        config.demo.viewport_width = 0.0;
        config.demo.tabs.clear();

        let warnings = config.validate();
        let fields: Vec<&str> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec![
                "strip.tab_margin",
                "strip.tail_margin_factor",
                "demo.viewport_width",
                "demo.tabs"
            ]
        );
        assert_eq!(config.strip.tab_margin, 0.0);
        assert_eq!(config.strip.tail_margin_factor, 1.3);
        assert_eq!(config.demo.viewport_width, 320.0);
        assert_eq!(config.demo.tabs.len(), 5);
    }

    #[test]
    fn test_config_paths_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths.last(), Some(&PathBuf::from("config.toml")));
    }
}
