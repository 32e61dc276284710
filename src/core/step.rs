use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScrollyError, ScrollyResult};

/// Zero-based position of a step region in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepIndex(usize);

impl StepIndex {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Parses a step index attribute as a base-10 unsigned integer.
    ///
    /// Surrounding ASCII whitespace is ignored. Signs, fractions, trailing
    /// garbage and values that overflow `usize` are rejected.
    pub fn parse_attribute(raw: &str) -> ScrollyResult<Self> {
        let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScrollyError::MalformedStepIndex {
                raw: raw.to_owned(),
            });
        }
        trimmed
            .parse::<usize>()
            .map(Self)
            .map_err(|_| ScrollyError::MalformedStepIndex {
                raw: raw.to_owned(),
            })
    }
}

impl From<usize> for StepIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl FromStr for StepIndex {
    type Err = ScrollyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_attribute(s)
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
