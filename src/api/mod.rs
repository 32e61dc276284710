//! Host-facing widget API: configuration, artifact retrieval, the step-to-chart
//! synchronizer and the composed widget.

mod config;
mod fetch;
mod synchronizer;
mod widget;

pub use config::{CompletionOrdering, WidgetConfig};
pub use fetch::{ArtifactFetcher, ArtifactResponse, StaticFileFetcher};
pub use synchronizer::{ActivationOutcome, ChartSynchronizer};
pub use widget::ScrollyWidget;
