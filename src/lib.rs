//! scrolly-chart: scroll-driven chart synchronization for scrollytelling pages.
//!
//! The widget side keeps one chart surface in step with the section a reader is
//! on. The `datagen` side produces the per-step chart documents offline.

pub mod api;
pub mod core;
pub mod datagen;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartSynchronizer, ScrollyWidget, WidgetConfig};
pub use error::{ScrollyError, ScrollyResult};
