use super::*;
use crate::*;

/// Everything one round of search produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub round: usize,
    pub phase: Phase,
    pub steps: Vec<Step>,
    pub sequence: Sequence,
    /// Baseline of the last step visited, which the confirmation estimate targets.
    pub baseline: Utility,
    /// Opponent mixture of the last step visited.
    pub opponent: MixedStrategy,
}

impl Report {
    pub fn confirmed(&self) -> bool {
        self.phase.is_confirmed()
    }
    /// Oracle trials issued across all steps.
    pub fn trials(&self) -> usize {
        self.steps.iter().map(|s| s.trials).sum()
    }
    pub fn timeouts(&self) -> usize {
        self.steps.iter().map(|s| s.timeouts).sum()
    }
}
