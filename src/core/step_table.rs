use crate::core::StepIndex;
use crate::error::{ScrollyError, ScrollyResult};

/// Immutable mapping from step index to chart artifact identifier.
///
/// Indices are contiguous from zero and follow the order of the list the
/// table was built from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepSpecTable {
    artifacts: Vec<String>,
}

impl StepSpecTable {
    #[must_use]
    pub fn new<I, S>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            artifacts: artifacts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve(&self, step: StepIndex) -> ScrollyResult<&str> {
        self.artifacts
            .get(step.get())
            .map(String::as_str)
            .ok_or(ScrollyError::MissingArtifactMapping { step })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepIndex, &str)> {
        self.artifacts
            .iter()
            .enumerate()
            .map(|(index, artifact)| (StepIndex::new(index), artifact.as_str()))
    }
}
