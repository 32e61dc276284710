use serde::{Deserialize, Serialize};

/// Visible slice of the document, in document-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportWindow {
    pub scroll_top: f64,
    pub height: f64,
}

impl ViewportWindow {
    #[must_use]
    pub fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.scroll_top.is_finite() && self.height.is_finite() && self.height > 0.0
    }

    #[must_use]
    pub fn span(self) -> VerticalSpan {
        VerticalSpan::new(self.scroll_top, self.scroll_top + self.height)
    }
}

/// A marked step section of the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRegion {
    /// Raw value of the region's step index attribute.
    pub index_attribute: String,
    pub top: f64,
    pub height: f64,
}

impl StepRegion {
    #[must_use]
    pub fn new(index_attribute: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            index_attribute: index_attribute.into(),
            top,
            height,
        }
    }

    #[must_use]
    pub fn span(&self) -> VerticalSpan {
        VerticalSpan::new(self.top, self.top + self.height.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalSpan {
    pub start: f64,
    pub end: f64,
}

impl VerticalSpan {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn len(self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0.0
    }

    /// Overlap length with `root`, or `None` when the spans do not intersect.
    ///
    /// Degenerate spans count as intersecting when they touch, so a zero-height
    /// crossing line still detects the region it lies in.
    #[must_use]
    pub fn overlap_with(self, root: VerticalSpan) -> Option<f64> {
        let start = self.start.max(root.start);
        let end = self.end.min(root.end);
        if self.is_empty() || root.is_empty() {
            return (start <= end).then_some(0.0);
        }
        (start < end).then_some(end - start)
    }
}
