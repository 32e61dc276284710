use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::StepIndex;
use crate::error::ScrollyResult;
use crate::interaction::{
    ScrollVisibilityTracker, StepDetector, StepRegion, ViewportWindow, VisibilityTracker,
};
use crate::render::ChartRenderer;

use super::{ActivationOutcome, ArtifactFetcher, ChartSynchronizer, WidgetConfig};

/// Composition root: visibility tracker, step detector and one synchronizer.
///
/// Activations are dispatched fire-and-forget with `spawn_local`, so every
/// method that dispatches must run inside a `tokio::task::LocalSet`. The
/// returned handles may be dropped without cancelling anything.
pub struct ScrollyWidget<F, R, T = ScrollVisibilityTracker> {
    synchronizer: Rc<ChartSynchronizer<F, R>>,
    detector: StepDetector,
    tracker: T,
}

impl<F, R> ScrollyWidget<F, R>
where
    F: ArtifactFetcher + 'static,
    R: ChartRenderer + 'static,
{
    pub fn new(
        config: &WidgetConfig,
        regions: Vec<StepRegion>,
        fetcher: F,
        renderer: R,
    ) -> ScrollyResult<Self> {
        let tracker = ScrollVisibilityTracker::new(config.trigger, regions);
        Self::with_tracker(config, tracker, fetcher, renderer)
    }
}

impl<F, R, T> ScrollyWidget<F, R, T>
where
    F: ArtifactFetcher + 'static,
    R: ChartRenderer + 'static,
    T: VisibilityTracker,
{
    pub fn with_tracker(
        config: &WidgetConfig,
        tracker: T,
        fetcher: F,
        renderer: R,
    ) -> ScrollyResult<Self> {
        let synchronizer = ChartSynchronizer::from_config(fetcher, renderer, config)?;
        Ok(Self {
            synchronizer: Rc::new(synchronizer),
            detector: StepDetector::new(config.trigger),
            tracker,
        })
    }

    /// Populates the initial view with step 0, before any scroll event.
    pub fn setup(&self) -> JoinHandle<ActivationOutcome> {
        debug!("initial step activation");
        self.dispatch(StepIndex::new(0))
    }

    /// Feeds one scroll position through the tracker and detector.
    ///
    /// Returns one handle per forwarded step, in batch order.
    pub fn on_scroll(&mut self, window: ViewportWindow) -> Vec<JoinHandle<ActivationOutcome>> {
        let batch = self.tracker.observe(window);
        let mut handles = Vec::new();
        self.detector
            .forward(&batch, |step| handles.push(self.dispatch(step)));
        handles
    }

    pub fn dispatch(&self, step: StepIndex) -> JoinHandle<ActivationOutcome> {
        let synchronizer = Rc::clone(&self.synchronizer);
        tokio::task::spawn_local(async move { synchronizer.activate(step).await })
    }

    #[must_use]
    pub fn synchronizer(&self) -> &ChartSynchronizer<F, R> {
        &self.synchronizer
    }

    #[must_use]
    pub fn detector(&self) -> StepDetector {
        self.detector
    }

    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }
}
