use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::StepIndex;

use super::{TriggerPolicy, VisibilityEntry};

/// Stateless filter from visibility batches to step activations.
///
/// Every qualifying entry is forwarded in batch order. Repeated indices are
/// left for the synchronizer to collapse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepDetector {
    policy: TriggerPolicy,
}

impl StepDetector {
    #[must_use]
    pub fn new(policy: TriggerPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    /// Step indices of the qualifying entries, in batch order.
    ///
    /// Entries whose index attribute does not parse are logged and dropped.
    #[must_use]
    pub fn qualifying_steps(&self, batch: &[VisibilityEntry]) -> SmallVec<[StepIndex; 4]> {
        let mut steps = SmallVec::new();
        for entry in batch.iter().filter(|entry| self.policy.qualifies(entry)) {
            match StepIndex::parse_attribute(&entry.index_attribute) {
                Ok(step) => steps.push(step),
                Err(err) => warn!(
                    position = entry.position,
                    error = %err,
                    "skipping step region with malformed index attribute"
                ),
            }
        }
        steps
    }

    /// Invokes `activate` once per qualifying entry.
    pub fn forward<F>(&self, batch: &[VisibilityEntry], mut activate: F)
    where
        F: FnMut(StepIndex),
    {
        for step in self.qualifying_steps(batch) {
            trace!(%step, "step region became active");
            activate(step);
        }
    }
}
