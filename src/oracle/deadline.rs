use crate::*;
use std::time::Duration;
use std::time::Instant;

/// Optional time limits on collaborator work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Wall-clock limit on one oracle trial plus its verification.
    pub trial: Option<Duration>,
    /// Wall-clock limit on all search and confirmation work of a round.
    pub round: Option<Duration>,
}

/// A started clock with an optional limit.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() > limit)
    }
    /// `Err(Timeout)` once the limit has passed.
    pub fn check(&self) -> Result<(), Error> {
        match self.expired() {
            true => Err(Error::Timeout(self.elapsed())),
            false => Ok(()),
        }
    }
}
