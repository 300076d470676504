use crate::*;

/// What happened at one testing step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub index: usize,
    /// Payoff a deviation had to strictly exceed.
    pub baseline: Utility,
    pub verdict: Verdict,
    /// Oracle trials issued; zero when replayed from an artifact.
    pub trials: usize,
    /// Trials counted as failures because they ran out of time.
    pub timeouts: usize,
    pub replayed: bool,
}

impl Step {
    pub fn found(&self) -> bool {
        self.verdict.deviation().is_some()
    }
    pub fn deviation(&self) -> Option<&Params> {
        self.verdict.deviation().map(|d| &d.params)
    }
}
