//! Per-step game data and step artifacts.
//!
//! Computing equilibria, regenerating payoff columns, and materializing a
//! deviation into the strategy pool happen outside this crate. An [`Arena`]
//! is the narrow view the search loop needs of all that: what to beat, whom
//! to beat it against, and whether a step has already been settled.

mod pool;
mod verdict;

pub use pool::*;
pub use verdict::*;

use crate::*;

pub trait Arena {
    /// Equilibrium payoff of the player under test at this step.
    fn baseline(&self, round: usize, step: usize) -> Result<Utility, Error>;
    /// Opponent equilibrium mixture at this step.
    fn opponent(&self, round: usize, step: usize) -> Result<MixedStrategy, Error>;
    /// The settled outcome of a step, if its artifact already exists.
    fn recall(&self, round: usize, step: usize) -> Result<Option<Verdict>, Error>;
    /// Persist a step's outcome. When `expand` is set and a deviation was
    /// accepted, the game data for `step + 1` is regenerated around it.
    fn settle(&self, round: usize, step: usize, verdict: &Verdict, expand: bool) -> Result<(), Error>;
}

impl<T> Arena for &T
where
    T: Arena + ?Sized,
{
    fn baseline(&self, round: usize, step: usize) -> Result<Utility, Error> {
        (**self).baseline(round, step)
    }
    fn opponent(&self, round: usize, step: usize) -> Result<MixedStrategy, Error> {
        (**self).opponent(round, step)
    }
    fn recall(&self, round: usize, step: usize) -> Result<Option<Verdict>, Error> {
        (**self).recall(round, step)
    }
    fn settle(&self, round: usize, step: usize, verdict: &Verdict, expand: bool) -> Result<(), Error> {
        (**self).settle(round, step, verdict, expand)
    }
}
