use serde::{Deserialize, Serialize};

use crate::core::StepSpecTable;
use crate::error::{ScrollyError, ScrollyResult};
use crate::interaction::TriggerPolicy;
use crate::render::RenderOptions;

/// How completions of overlapping activations are applied to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOrdering {
    /// Every completed activation renders, even if a newer step was claimed
    /// while it was in flight.
    #[default]
    Unordered,
    /// Completions whose step is no longer the latest claim are discarded.
    Strict,
}

/// Widget bootstrap configuration.
///
/// Serializable so pages can ship it next to the artifacts it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Artifact identifier per step, in step order.
    pub steps: Vec<String>,
    #[serde(default)]
    pub trigger: TriggerPolicy,
    #[serde(default)]
    pub render_options: RenderOptions,
    #[serde(default)]
    pub completion_ordering: CompletionOrdering,
}

impl WidgetConfig {
    #[must_use]
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            trigger: TriggerPolicy::default(),
            render_options: RenderOptions::default(),
            completion_ordering: CompletionOrdering::default(),
        }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerPolicy) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn with_render_options(mut self, render_options: RenderOptions) -> Self {
        self.render_options = render_options;
        self
    }

    #[must_use]
    pub fn with_completion_ordering(mut self, ordering: CompletionOrdering) -> Self {
        self.completion_ordering = ordering;
        self
    }

    pub fn validate(&self) -> ScrollyResult<()> {
        self.trigger.validate()?;
        if let Some(position) = self.steps.iter().position(|s| s.trim().is_empty()) {
            return Err(ScrollyError::InvalidConfig(format!(
                "step {position} has an empty artifact identifier"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn step_table(&self) -> StepSpecTable {
        StepSpecTable::new(self.steps.iter().cloned())
    }

    pub fn from_json_str(input: &str) -> ScrollyResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ScrollyError::InvalidConfig(format!("failed to parse widget config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ScrollyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ScrollyError::InvalidConfig(format!("failed to serialize widget config: {e}"))
        })
    }
}
