use super::*;
use crate::*;

/// Per-step error budget for one round of deviation search.
///
/// Holds the tolerance share `alpha[s]` of every step and the assumed lower
/// bound on the per-trial improvement probability. The trial count of a step
/// is derived from its own share when the step begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    alphas: Vec<Probability>,
    min_improve: Probability,
}

impl Budget {
    /// Uniform split of `tolerance` over `steps`.
    pub fn new(tolerance: Probability, steps: usize, min_improve: Probability) -> Result<Self, Error> {
        Self::from_alphas(allocate_tolerance(tolerance, steps)?, min_improve)
    }
    /// Explicit per-step shares. Every share must yield a finite trial count.
    pub fn from_alphas(alphas: Vec<Probability>, min_improve: Probability) -> Result<Self, Error> {
        if alphas.is_empty() {
            return Err(Error::Config("budget needs at least one step".into()));
        }
        for &alpha in &alphas {
            required_trials(min_improve, alpha)?;
        }
        Ok(Self { alphas, min_improve })
    }
    /// Step limit of a round.
    pub fn steps(&self) -> usize {
        self.alphas.len()
    }
    pub fn alphas(&self) -> &[Probability] {
        &self.alphas
    }
    pub fn alpha(&self, step: usize) -> Probability {
        self.alphas[step]
    }
    pub fn min_improve(&self) -> Probability {
        self.min_improve
    }
    /// Oracle trials allotted to `step`.
    pub fn trials(&self, step: usize) -> Result<usize, Error> {
        let alpha = self
            .alphas
            .get(step)
            .copied()
            .ok_or_else(|| Error::Config(format!("step {} beyond step limit {}", step, self.steps())))?;
        required_trials(self.min_improve, alpha)
    }
    /// Total worst-case oracle trials of a round.
    pub fn worst_case(&self) -> Result<usize, Error> {
        (0..self.steps()).map(|s| self.trials(s)).sum()
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shares = self
            .alphas
            .iter()
            .map(|a| format!("{:.6}", a))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "p ≥ {:.4}  α = [{}]", self.min_improve, shares)
    }
}
