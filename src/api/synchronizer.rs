use std::cell::Cell;

use tracing::{debug, warn};

use crate::core::{StepIndex, StepSpecTable};
use crate::error::{FailureKind, ScrollyError, ScrollyResult};
use crate::render::{ChartRenderer, RenderOptions};

use super::{ArtifactFetcher, CompletionOrdering, WidgetConfig};

/// Result of one `activate` call. Informational only; nothing is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The step was already the current claim.
    Unchanged,
    Rendered,
    /// Strict ordering dropped the completion because a newer step was claimed.
    Stale,
    Failed(FailureKind),
}

/// Maps step indices to chart artifacts and keeps the surface in sync.
///
/// All state lives in `Cell`s so overlapping activations can share one
/// instance on a single thread. The step claim happens before the first await
/// point; that claim is the only serialization between activations.
pub struct ChartSynchronizer<F, R> {
    fetcher: F,
    renderer: R,
    table: StepSpecTable,
    render_options: RenderOptions,
    ordering: CompletionOrdering,
    current_step: Cell<Option<StepIndex>>,
    generation: Cell<u64>,
}

impl<F: ArtifactFetcher, R: ChartRenderer> ChartSynchronizer<F, R> {
    #[must_use]
    pub fn new(fetcher: F, renderer: R, table: StepSpecTable) -> Self {
        Self {
            fetcher,
            renderer,
            table,
            render_options: RenderOptions::default(),
            ordering: CompletionOrdering::default(),
            current_step: Cell::new(None),
            generation: Cell::new(0),
        }
    }

    pub fn from_config(fetcher: F, renderer: R, config: &WidgetConfig) -> ScrollyResult<Self> {
        config.validate()?;
        Ok(Self::new(fetcher, renderer, config.step_table())
            .with_render_options(config.render_options)
            .with_completion_ordering(config.completion_ordering))
    }

    #[must_use]
    pub fn with_render_options(mut self, render_options: RenderOptions) -> Self {
        self.render_options = render_options;
        self
    }

    #[must_use]
    pub fn with_completion_ordering(mut self, ordering: CompletionOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Latest claimed step, `None` before the first activation.
    #[must_use]
    pub fn current_step(&self) -> Option<StepIndex> {
        self.current_step.get()
    }

    #[must_use]
    pub fn step_table(&self) -> &StepSpecTable {
        &self.table
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        self.render_options
    }

    #[must_use]
    pub fn completion_ordering(&self) -> CompletionOrdering {
        self.ordering
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Brings the surface to `step`'s chart.
    ///
    /// Repeating the current step is a no-op. Failures are logged and reported
    /// through the outcome; the surface keeps whatever it showed before.
    pub async fn activate(&self, step: StepIndex) -> ActivationOutcome {
        if self.current_step.get() == Some(step) {
            debug!(%step, "step already current");
            return ActivationOutcome::Unchanged;
        }

        self.current_step.set(Some(step));
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        debug!(%step, generation, "claimed step");

        match self.load_and_render(step, generation).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    %step,
                    artifact = self.table.resolve(step).unwrap_or("<unmapped>"),
                    error = %err,
                    "chart update failed"
                );
                ActivationOutcome::Failed(err.kind())
            }
        }
    }

    async fn load_and_render(
        &self,
        step: StepIndex,
        generation: u64,
    ) -> ScrollyResult<ActivationOutcome> {
        let artifact = self.table.resolve(step)?;

        let response = self.fetcher.fetch(artifact).await?;
        if !response.is_success() {
            return Err(ScrollyError::TransportFailure {
                status: response.status,
                artifact: artifact.to_owned(),
            });
        }

        let document: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(|e| ScrollyError::DecodeFailure {
                artifact: artifact.to_owned(),
                reason: e.to_string(),
            })?;

        if self.ordering == CompletionOrdering::Strict && self.generation.get() != generation {
            debug!(%step, artifact, "dropping stale completion");
            return Ok(ActivationOutcome::Stale);
        }

        self.renderer
            .render(&document, &self.render_options)
            .await
            .map_err(|err| match err {
                ScrollyError::RenderFailure { .. } => err,
                other => ScrollyError::RenderFailure {
                    reason: other.to_string(),
                },
            })?;

        debug!(%step, artifact, "rendered step chart");
        Ok(ActivationOutcome::Rendered)
    }
}
