use crate::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Mutex;
use std::time::Instant;

/// Runs every round of a deviation test and records the outcomes.
///
/// A run validates its configuration and reserves its output files before
/// the first oracle call. Rounds are independent: each gets its own claim,
/// its own random stream, and its own slice of the arena, so they may be
/// spread across worker threads. Outputs are written once, ordered by round,
/// after the last round finishes.
pub struct Experiment<O, E, A> {
    config: Config,
    oracle: O,
    evaluator: E,
    arena: A,
    registry: Registry,
}

impl<O, E, A> Experiment<O, E, A> {
    pub fn new(config: Config, oracle: O, evaluator: E, arena: A) -> Self {
        Self {
            config,
            oracle,
            evaluator,
            arena,
            registry: Registry::default(),
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn arena(&self) -> &A {
        &self.arena
    }
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    /// Per-round random stream, reproducible when the run is seeded.
    fn rng(&self, round: usize) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add((round as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))),
            None => SmallRng::from_os_rng(),
        }
    }
}

impl<O, E, A> Experiment<O, E, A>
where
    O: BestResponse + Sync,
    E: Evaluator + Sync,
    A: Arena + Sync,
{
    pub fn run(&self) -> Result<Vec<Outcome>, Error> {
        self.config.validate()?;
        let mut recorder = Recorder::new(self.config.results_path(), self.config.deviations_path())?;
        if self.config.checkpoint {
            recorder = recorder.checkpointed()?;
        }
        let ref budget = self.config.budget()?;
        self.config.log();
        log::info!("{:<32}{}", "tolerance per step", budget);
        let pending = (0..self.config.rounds)
            .filter(|round| !recorder.contains(*round))
            .collect::<Vec<_>>();
        log::info!("{:<32}{} of {}", "rounds      pending", pending.len(), self.config.rounds);
        let start = Instant::now();
        let recorder = Mutex::new(recorder);
        self.schedule(&pending, budget, &recorder)?;
        let recorder = recorder.into_inner().unwrap_or_else(|p| p.into_inner());
        let outcomes = recorder.finish()?;
        log::info!(
            "{:<32}{} confirmed of {} in {:.2} minutes",
            "experiment  finished",
            outcomes.iter().filter(|o| o.confirmed).count(),
            outcomes.len(),
            start.elapsed().as_secs_f64() / 60.
        );
        Ok(outcomes)
    }

    fn schedule(&self, rounds: &[usize], budget: &Budget, recorder: &Mutex<Recorder>) -> Result<(), Error> {
        #[cfg(feature = "server")]
        if self.config.workers > 1 {
            use rayon::prelude::*;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers)
                .build()
                .map_err(|e| Error::Config(format!("worker pool: {}", e)))?;
            return pool.install(|| {
                rounds
                    .par_iter()
                    .try_for_each(|&round| self.record(round, budget, recorder))
            });
        }
        rounds
            .iter()
            .try_for_each(|&round| self.record(round, budget, recorder))
    }

    fn record(&self, round: usize, budget: &Budget, recorder: &Mutex<Recorder>) -> Result<(), Error> {
        let (outcome, sequence) = self.round(round, budget)?;
        recorder
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(outcome, sequence)
    }

    /// Deviation search followed by the confirmation estimate for one round.
    pub fn round(&self, round: usize, budget: &Budget) -> Result<(Outcome, Sequence), Error> {
        let claim = self.registry.claim(round)?;
        let start = Instant::now();
        let ref mut rng = self.rng(round);
        let ref search = self.config.search();
        let ref stopping = self.config.stopping()?;
        let limits = self.config.limits();
        let clock = Deadline::start(limits.round);
        let probe = || Probe::new(&self.oracle, &self.evaluator, search, self.config.extra_samples, limits.trial);
        let report = DeviationSearch::new(probe(), &self.arena, budget).run_within(round, &clock, rng)?;
        let tally = Confirmer::new(probe(), &report.opponent, report.baseline).sample(stopping, &clock, rng)?;
        let outcome = Outcome {
            confirmed: report.confirmed(),
            round,
            probability: tally.rate(),
        };
        if round % ROUND_LOG_INTERVAL == 0 {
            log::info!("{:<32}{}", "round       result", outcome);
        }
        log::info!(
            "{:<32}{:<16}{} trials, {} timeouts, {:.2} minutes",
            "round       finished",
            format!("round {}", round),
            report.trials(),
            report.timeouts(),
            start.elapsed().as_secs_f64() / 60.
        );
        claim.finish();
        Ok((outcome, report.sequence))
    }
}
