use crate::*;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Done,
}

/// In-process claim record for test rounds.
///
/// `claim` is a compare-and-set on the round's entry: it succeeds only if no
/// worker holds or has finished the round. A [`Claim`] dropped without
/// [`Claim::finish`] releases the round so it can be retried.
#[derive(Debug, Default)]
pub struct Registry {
    rounds: Mutex<BTreeMap<usize, State>>,
}

impl Registry {
    pub fn claim(&self, round: usize) -> Result<Claim<'_>, Error> {
        let mut rounds = self.lock();
        if rounds.contains_key(&round) {
            return Err(Error::Claimed(round));
        }
        rounds.insert(round, State::Running);
        Ok(Claim {
            registry: self,
            round,
            finished: false,
        })
    }
    pub fn is_done(&self, round: usize) -> bool {
        self.lock().get(&round) == Some(&State::Done)
    }
    pub fn running(&self) -> usize {
        self.lock().values().filter(|s| **s == State::Running).count()
    }
    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, State>> {
        self.rounds.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive hold on one round.
#[derive(Debug)]
pub struct Claim<'a> {
    registry: &'a Registry,
    round: usize,
    finished: bool,
}

impl Claim<'_> {
    pub fn round(&self) -> usize {
        self.round
    }
    /// Marks the round done; it can never be claimed again.
    pub fn finish(mut self) {
        self.finished = true;
        self.registry.lock().insert(self.round, State::Done);
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.lock().remove(&self.round);
        }
    }
}
