use crate::*;

/// Hyperparameters handed to the oracle on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    /// Maximum candidate evaluations within one trial.
    pub budget: usize,
    /// Payoff samples per candidate evaluation.
    pub samples: usize,
    /// Variance of the Gaussian neighbor perturbation.
    pub variance: f64,
    /// Starting point; `None` lets the oracle pick one at random.
    pub initial: Option<Params>,
    /// Emit per-candidate diagnostics.
    pub verbose: bool,
}

/// Best candidate of one oracle trial, with the oracle's own estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub params: Params,
    pub estimate: Utility,
}
