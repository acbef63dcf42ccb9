//! Tabstrip Protocol
//!
//! Line-delimited JSON messages between a host UI and the tabstrip engine.
//! Hosts emit [`HostEvent`]s (layout reports, progress samples, scroll
//! reports, activations); the engine answers with [`HostCommand`]s.

use serde::{Deserialize, Serialize};
use tabstrip_core::{Rect, TabDescriptor};
use thiserror::Error;

/// Longest accepted message line in bytes.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Errors that can occur while decoding or encoding protocol lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Line is {0} bytes (max: {1})")]
    LineTooLong(usize, usize),

    #[error("Empty line")]
    EmptyLine,

    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Events a host reports to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The tab list changed.
    SetTabs {
        /// Tabs in display order.
        tabs: Vec<TabDescriptor>,
    },
    /// A tab view was laid out.
    TabLayout {
        /// Page index of the tab.
        page: usize,
        /// Measured rectangle.
        rect: Rect,
    },
    /// The strip viewport was laid out.
    ViewportLayout {
        /// Visible strip rectangle.
        rect: Rect,
    },
    /// The scrollable content changed size.
    ContentSize {
        /// Content width.
        width: f64,
        /// Content height.
        height: f64,
    },
    /// The pager's page progress changed.
    Progress {
        /// Progress in fractional page units.
        value: f64,
    },
    /// The strip scrolled.
    Scroll {
        /// New horizontal offset.
        offset: f64,
    },
    /// A tab was activated (tap or settled swipe).
    Activate {
        /// Page index of the new active tab.
        page: usize,
    },
    /// The user started dragging the pager.
    DragStart,
    /// The user released the pager.
    DragEnd,
}

/// Commands the engine issues to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Set the underline indicator's transform.
    ApplyIndicator {
        /// Horizontal translation.
        translate_x: f64,
        /// Horizontal scale (equals the rendered width).
        scale_x: f64,
    },
    /// Scroll the strip immediately.
    ScrollTo {
        /// Target horizontal offset.
        x: f64,
    },
}

/// Decode one event line (trailing newline allowed).
pub fn parse_event_line(line: &str) -> Result<HostEvent, ProtocolError> {
    if line.len() > MAX_LINE_LEN {
        return Err(ProtocolError::LineTooLong(line.len(), MAX_LINE_LEN));
    }
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }
    Ok(serde_json::from_str(line)?)
}

/// Encode one command as a JSON line without the trailing newline.
pub fn encode_command(command: &HostCommand) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(command)?)
}
