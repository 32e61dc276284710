use serde::{Deserialize, Serialize};

use crate::error::{ScrollyError, ScrollyResult};

use super::{VerticalSpan, ViewportWindow, VisibilityEntry};

/// Visibility condition that makes a step region the active reading position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Region is active once at least `threshold` of its height is inside the viewport.
    AreaRatio { threshold: f64 },
    /// Region is active while it crosses a horizontal band. The band is the
    /// viewport shrunk by the given fractions of its height from each edge.
    CrossingBand {
        top_inset_ratio: f64,
        bottom_inset_ratio: f64,
    },
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::majority_visible()
    }
}

impl TriggerPolicy {
    #[must_use]
    pub const fn majority_visible() -> Self {
        Self::AreaRatio { threshold: 0.5 }
    }

    /// Thin band just below the vertical centre of the viewport.
    #[must_use]
    pub const fn center_band() -> Self {
        Self::CrossingBand {
            top_inset_ratio: 0.5,
            bottom_inset_ratio: 0.49,
        }
    }

    pub fn validate(self) -> ScrollyResult<()> {
        match self {
            Self::AreaRatio { threshold } => {
                if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                    return Err(ScrollyError::InvalidConfig(format!(
                        "area ratio threshold must be in [0, 1], got {threshold}"
                    )));
                }
            }
            Self::CrossingBand {
                top_inset_ratio,
                bottom_inset_ratio,
            } => {
                for (name, value) in [("top", top_inset_ratio), ("bottom", bottom_inset_ratio)] {
                    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                        return Err(ScrollyError::InvalidConfig(format!(
                            "{name} inset ratio must be in [0, 1], got {value}"
                        )));
                    }
                }
                if top_inset_ratio + bottom_inset_ratio > 1.0 {
                    return Err(ScrollyError::InvalidConfig(
                        "crossing band insets overlap".to_owned(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Observation root for the given viewport.
    #[must_use]
    pub fn root_span(self, window: ViewportWindow) -> VerticalSpan {
        match self {
            Self::AreaRatio { .. } => window.span(),
            Self::CrossingBand {
                top_inset_ratio,
                bottom_inset_ratio,
            } => VerticalSpan::new(
                window.scroll_top + window.height * top_inset_ratio,
                window.scroll_top + window.height * (1.0 - bottom_inset_ratio),
            ),
        }
    }

    /// Ratio the tracker reports threshold crossings against.
    #[must_use]
    pub fn threshold(self) -> f64 {
        match self {
            Self::AreaRatio { threshold } => threshold,
            Self::CrossingBand { .. } => 0.0,
        }
    }

    #[must_use]
    pub fn qualifies(self, entry: &VisibilityEntry) -> bool {
        entry.is_intersecting && entry.intersection_ratio >= self.threshold()
    }
}
