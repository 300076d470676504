use super::*;
use crate::*;
use rand::RngCore;
use std::time::Duration;
use std::time::Instant;

/// A verified oracle trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified {
    pub trial: Trial,
    /// Payoff from the evaluator, the number acceptance decisions use.
    pub payoff: Utility,
    pub elapsed: Duration,
}

impl Verified {
    /// Strict improvement; ties never count.
    pub fn beats(&self, baseline: Utility) -> bool {
        self.payoff > baseline
    }
}

/// One oracle call followed by independent payoff verification.
///
/// Shared by the greedy search and the confirmation estimate so both sites
/// see the same oracle contract.
pub struct Probe<'a, O, E> {
    oracle: &'a O,
    evaluator: &'a E,
    search: &'a Search,
    extra: usize,
    timeout: Option<Duration>,
}

impl<'a, O, E> Probe<'a, O, E>
where
    O: BestResponse,
    E: Evaluator,
{
    pub fn new(oracle: &'a O, evaluator: &'a E, search: &'a Search, extra: usize, timeout: Option<Duration>) -> Self {
        Self {
            oracle,
            evaluator,
            search,
            extra,
            timeout,
        }
    }
    pub fn search(&self) -> &Search {
        self.search
    }
    /// Runs one trial. A collaborator-reported timeout, or a call that ran
    /// past the trial limit, yields [`Error::Timeout`].
    pub fn run(&self, opponent: &MixedStrategy, rng: &mut dyn RngCore) -> Result<Verified, Error> {
        let start = Instant::now();
        let trial = self.oracle.search(opponent, self.search, rng)?;
        let payoff = self
            .evaluator
            .evaluate(&trial.params, opponent, self.extra, rng)?;
        let elapsed = start.elapsed();
        match self.timeout {
            Some(limit) if elapsed > limit => Err(Error::Timeout(elapsed)),
            _ => Ok(Verified {
                trial,
                payoff,
                elapsed,
            }),
        }
    }
}
