use super::*;
use crate::*;
use rand::RngCore;
use std::time::Instant;

/// Re-estimates `Pr[one oracle trial finds a deviation]` against a round's
/// final baseline, independently of the greedy search that preceded it.
///
/// The returned probability is a point estimate; the Clopper–Pearson bound
/// only governs when sampling stops. Timeouts are fatal here, since treating
/// them as failures would bias the estimate downward.
pub struct Confirmer<'a, O, E> {
    probe: Probe<'a, O, E>,
    opponent: &'a MixedStrategy,
    baseline: Utility,
}

impl<'a, O, E> Confirmer<'a, O, E>
where
    O: BestResponse,
    E: Evaluator,
{
    pub fn new(probe: Probe<'a, O, E>, opponent: &'a MixedStrategy, baseline: Utility) -> Self {
        Self {
            probe,
            opponent,
            baseline,
        }
    }
    /// Fraction of beneficial trials when the stopping rule fires.
    pub fn estimate(
        &self,
        min_trials: usize,
        max_trials: usize,
        early_stop_level: Probability,
        rng: &mut dyn RngCore,
    ) -> Result<Probability, Error> {
        let ref stopping = Stopping::new(min_trials, max_trials, early_stop_level)?;
        self.sample(stopping, &Deadline::start(None), rng)
            .map(|tally| tally.rate())
    }
    /// Draws trials until `stopping` says otherwise or `clock` runs out.
    pub fn sample(&self, stopping: &Stopping, clock: &Deadline, rng: &mut dyn RngCore) -> Result<Confidence, Error> {
        log::info!("{:<32}up to {} trials", "estimating  deviation odds", stopping.max());
        let start = Instant::now();
        let mut tally = Confidence::default();
        while stopping.proceed(&tally)? {
            clock.check()?;
            let verified = self.probe.run(self.opponent, rng)?;
            tally.observe(verified.beats(self.baseline));
            if tally.trials() % CONFIRM_LOG_INTERVAL == 0 {
                log::info!("{:<32}{:<8}beneficial {}", "confirmation trials", tally.trials(), tally.beneficial());
            }
        }
        log::info!(
            "{:<32}{} of possible {}, rate {:.4}, {:?}",
            "confirmation finished",
            tally.trials(),
            stopping.max(),
            tally.rate(),
            start.elapsed()
        );
        Ok(tally)
    }
}
