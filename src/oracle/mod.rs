//! The two collaborator seams of deviation testing.
//!
//! [`BestResponse`] proposes a candidate deviation from one independent
//! noisy search; [`Evaluator`] scores a candidate against a fixed opponent.
//! The oracle's own estimate only guides its search: acceptance decisions
//! are made against the evaluator's payoff, via a [`Probe`].

mod deadline;
mod probe;
mod retry;
mod search;

#[cfg(test)]
pub(crate) mod fake;

pub use deadline::*;
pub use probe::*;
pub use retry::*;
pub use search::*;

use crate::*;
use rand::RngCore;

/// One independent run of a noisy best-response search.
///
/// Calls carry no hidden state between them; the only source of variation
/// is the caller's random stream. Failure to evaluate must surface as an
/// error, never as a default candidate.
pub trait BestResponse {
    fn search(&self, opponent: &MixedStrategy, search: &Search, rng: &mut dyn RngCore) -> Result<Trial, Error>;
}

/// Monte-Carlo payoff of a candidate against an opponent mixture.
pub trait Evaluator {
    fn evaluate(
        &self,
        candidate: &Params,
        opponent: &MixedStrategy,
        samples: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Utility, Error>;
}

impl<T> BestResponse for &T
where
    T: BestResponse + ?Sized,
{
    fn search(&self, opponent: &MixedStrategy, search: &Search, rng: &mut dyn RngCore) -> Result<Trial, Error> {
        (**self).search(opponent, search, rng)
    }
}

impl<T> Evaluator for &T
where
    T: Evaluator + ?Sized,
{
    fn evaluate(
        &self,
        candidate: &Params,
        opponent: &MixedStrategy,
        samples: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Utility, Error> {
        (**self).evaluate(candidate, opponent, samples, rng)
    }
}
