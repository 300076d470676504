//! Deterministic collaborators for exercising the control loop.

use super::*;
use crate::*;
use rand::RngCore;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

pub fn opponent() -> MixedStrategy {
    MixedStrategy::pure("att0")
}

pub fn search() -> Search {
    Search {
        budget: 3,
        samples: 3,
        variance: 0.05,
        initial: None,
        verbose: false,
    }
}

/// Replays a script of first coordinates, cycling when exhausted.
///
/// Paired with [`Echo`], the scripted value is the verified payoff.
pub struct Scripted {
    script: Vec<f64>,
    estimate: Option<Utility>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    timeouts: Mutex<Vec<usize>>,
}

impl Scripted {
    pub fn new(script: &[f64]) -> Self {
        Self {
            script: script.to_vec(),
            estimate: None,
            delay: None,
            calls: AtomicUsize::new(0),
            timeouts: Mutex::new(Vec::new()),
        }
    }
    /// Never improves on any baseline at or above zero.
    pub fn flat() -> Self {
        Self::new(&[0.0])
    }
    pub fn with_estimate(mut self, estimate: Utility) -> Self {
        self.estimate = Some(estimate);
        self
    }
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
    /// Calls (by index) that report a collaborator timeout.
    pub fn with_timeouts(self, calls: &[usize]) -> Self {
        if let Ok(mut timeouts) = self.timeouts.lock() {
            timeouts.extend_from_slice(calls);
        }
        self
    }
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl BestResponse for Scripted {
    fn search(&self, _: &MixedStrategy, _: &Search, _: &mut dyn RngCore) -> Result<Trial, Error> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.timeouts.lock().map(|t| t.contains(&n)).unwrap_or(false) {
            return Err(Error::Timeout(Duration::from_secs(1)));
        }
        let x = self.script[n % self.script.len()];
        Ok(Trial {
            params: Params::try_from(vec![x, 0.5, 0.5])?,
            estimate: self.estimate.unwrap_or(x),
        })
    }
}

/// Always fails.
pub struct Broken;

impl BestResponse for Broken {
    fn search(&self, _: &MixedStrategy, _: &Search, _: &mut dyn RngCore) -> Result<Trial, Error> {
        Err(Error::Oracle("scorer unreachable".into()))
    }
}

/// Verified payoff equals the candidate's first coordinate.
pub struct Echo;

impl Evaluator for Echo {
    fn evaluate(&self, candidate: &Params, _: &MixedStrategy, _: usize, _: &mut dyn RngCore) -> Result<Utility, Error> {
        Ok(candidate.coords()[0])
    }
}
