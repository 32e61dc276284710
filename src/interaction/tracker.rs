use tracing::{trace, warn};

use super::{StepRegion, TriggerPolicy, ViewportWindow};

/// One region's visibility as delivered in an observation batch.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    /// Position of the region in document order.
    pub position: usize,
    pub index_attribute: String,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

/// Platform capability that reports visibility changes of observed regions.
///
/// Each call delivers one batch, ordered by document position.
pub trait VisibilityTracker {
    fn observe(&mut self, window: ViewportWindow) -> Vec<VisibilityEntry>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ObservedState {
    is_intersecting: bool,
    thresholds_crossed: usize,
}

/// Geometry-driven tracker with intersection-observer delivery rules.
///
/// The first observation reports every region. Later observations report a
/// region only when it starts or stops intersecting the root, or crosses the
/// policy threshold.
#[derive(Debug, Clone)]
pub struct ScrollVisibilityTracker {
    policy: TriggerPolicy,
    regions: Vec<StepRegion>,
    last_states: Vec<Option<ObservedState>>,
}

impl ScrollVisibilityTracker {
    #[must_use]
    pub fn new(policy: TriggerPolicy, regions: Vec<StepRegion>) -> Self {
        let last_states = vec![None; regions.len()];
        Self {
            policy,
            regions,
            last_states,
        }
    }

    #[must_use]
    pub fn regions(&self) -> &[StepRegion] {
        &self.regions
    }

    #[must_use]
    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    fn measure(&self, region: &StepRegion, window: ViewportWindow) -> (bool, f64) {
        let root = self.policy.root_span(window);
        let span = region.span();
        match span.overlap_with(root) {
            Some(_) if span.is_empty() => (true, 1.0),
            Some(overlap) => (true, (overlap / span.len()).clamp(0.0, 1.0)),
            None => (false, 0.0),
        }
    }
}

impl VisibilityTracker for ScrollVisibilityTracker {
    fn observe(&mut self, window: ViewportWindow) -> Vec<VisibilityEntry> {
        if !window.is_valid() {
            warn!(
                scroll_top = window.scroll_top,
                height = window.height,
                "ignoring observation for invalid viewport window"
            );
            return Vec::new();
        }

        let threshold = self.policy.threshold();
        let mut batch = Vec::new();
        for position in 0..self.regions.len() {
            let region = &self.regions[position];
            let (is_intersecting, intersection_ratio) = self.measure(region, window);
            let state = ObservedState {
                is_intersecting,
                thresholds_crossed: usize::from(is_intersecting && intersection_ratio >= threshold),
            };
            if self.last_states[position] == Some(state) {
                continue;
            }
            batch.push(VisibilityEntry {
                position,
                index_attribute: region.index_attribute.clone(),
                is_intersecting,
                intersection_ratio,
            });
            self.last_states[position] = Some(state);
        }

        trace!(
            scroll_top = window.scroll_top,
            delivered = batch.len(),
            "visibility batch"
        );
        batch
    }
}
