//! Tabstrip Core
//!
//! Platform-agnostic synchronization engine for a scrollable strip of tabs
//! driven by a paged view.
//!
//! Given a continuously varying page-progress value, the engine keeps:
//! - an underline indicator's position and width locked to the active tab
//! - the strip's own scroll offset following the active tab
//!
//! Tab sizes are only known once the host has laid every tab out, so the
//! pipeline is: layout events -> [`LayoutRegistry`] / [`ContainerMetrics`]
//! -> [`InterpolationTable`] -> progress evaluation, plus a one-shot
//! [`ViewportOverflowCorrector`] for discrete activations.

pub mod config;
pub mod evaluator;
pub mod geometry;
pub mod host;
pub mod interpolate;
pub mod metrics;
pub mod overflow;
pub mod registry;
pub mod render;
pub mod strip;
pub mod table;

pub use config::{Color, IndicatorStyle, ScrollFollow, StripConfig};
pub use evaluator::{evaluate, IndicatorTransform, ProgressFrame};
pub use geometry::Rect;
pub use host::{ListenerId, MountedStrip, ProgressSource, ProgressValue, StripHost, Subscription};
pub use interpolate::{Extrapolate, Interpolation, InterpolationError};
pub use metrics::ContainerMetrics;
pub use overflow::{Correction, OverflowSide, ViewportOverflowCorrector};
pub use registry::{Completion, LayoutRegistry};
pub use render::{
    BadgeChrome, DefaultTabRenderer, IndicatorChrome, RenderProps, StripFrame, TabChrome,
    TabContext, TabDescriptor, TabRenderer,
};
pub use strip::{ActivationState, Effects, TabStrip, UpdateOutcome};
pub use table::{InterpolationTable, TableError, TableParams};
