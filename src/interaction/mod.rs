//! Scroll-position side of the widget: which step region is the reader on.

mod detector;
mod geometry;
mod tracker;
mod trigger;

pub use detector::StepDetector;
pub use geometry::{StepRegion, VerticalSpan, ViewportWindow};
pub use tracker::{ScrollVisibilityTracker, VisibilityEntry, VisibilityTracker};
pub use trigger::TriggerPolicy;
