use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs, validated before the first oracle trial.
///
/// Defaults are small debugging values; a JSON file may override any subset
/// of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix of every output file.
    pub run: String,
    /// Independent test rounds.
    pub rounds: usize,
    /// Step limit per round.
    pub steps: usize,
    /// Total false-negative tolerance, split uniformly over steps.
    pub tolerance: Probability,
    /// Assumed lower bound on one trial's chance of finding a deviation.
    pub min_improve: Probability,
    /// Candidate evaluations inside one oracle trial.
    pub trial_budget: usize,
    pub samples_per_candidate: usize,
    pub neighbor_variance: f64,
    /// Samples used to verify a candidate's payoff.
    pub extra_samples: usize,
    pub confirm_min: usize,
    pub confirm_max: usize,
    pub early_stop: Probability,
    pub verbose: bool,
    /// Rounds run concurrently.
    pub workers: usize,
    /// Retries of transient collaborator failures.
    pub retries: usize,
    pub backoff_ms: u64,
    pub trial_timeout_ms: Option<u64>,
    pub round_timeout_ms: Option<u64>,
    /// Write each round to disk as soon as it finishes.
    pub checkpoint: bool,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub scenario: Scenario,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run: "dg1".into(),
            rounds: 2,
            steps: 3,
            tolerance: 0.2,
            min_improve: 0.2,
            trial_budget: 3,
            samples_per_candidate: 3,
            neighbor_variance: 0.05,
            extra_samples: 3,
            confirm_min: 10,
            confirm_max: 10,
            early_stop: 0.4,
            verbose: true,
            workers: 1,
            retries: 0,
            backoff_ms: 500,
            trial_timeout_ms: None,
            round_timeout_ms: None,
            checkpoint: false,
            output: PathBuf::from("."),
            seed: None,
            scenario: Scenario::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
    /// Fails fast on the first invalid setting.
    pub fn validate(&self) -> Result<(), Error> {
        let fail = |msg: String| Err(Error::Config(msg));
        if self.run.is_empty() {
            return fail("run name is empty".into());
        }
        if self.rounds == 0 {
            return fail("at least one round is required".into());
        }
        if self.steps == 0 {
            return fail("at least one step per round is required".into());
        }
        if self.trial_budget == 0 || self.samples_per_candidate == 0 || self.extra_samples == 0 {
            return fail("trial budget and sample counts must be positive".into());
        }
        if !(self.neighbor_variance.is_finite() && self.neighbor_variance > 0.) {
            return fail(format!("neighbor variance {} must be positive", self.neighbor_variance));
        }
        if self.workers == 0 {
            return fail("at least one worker is required".into());
        }
        if self.trial_timeout_ms == Some(0) || self.round_timeout_ms == Some(0) {
            return fail("timeouts must be positive when set".into());
        }
        self.budget()?;
        self.stopping()?;
        self.scenario.validate()
    }
    pub fn budget(&self) -> Result<Budget, Error> {
        Budget::new(self.tolerance, self.steps, self.min_improve)
    }
    pub fn stopping(&self) -> Result<Stopping, Error> {
        Stopping::new(self.confirm_min, self.confirm_max, self.early_stop)
    }
    pub fn search(&self) -> Search {
        Search {
            budget: self.trial_budget,
            samples: self.samples_per_candidate,
            variance: self.neighbor_variance,
            initial: None,
            verbose: self.verbose,
        }
    }
    pub fn limits(&self) -> Limits {
        Limits {
            trial: self.trial_timeout_ms.map(Duration::from_millis),
            round: self.round_timeout_ms.map(Duration::from_millis),
        }
    }
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
    pub fn results_path(&self) -> PathBuf {
        self.output.join(format!("{}_results.tsv", self.run))
    }
    pub fn deviations_path(&self) -> PathBuf {
        self.output.join(format!("{}_deviations.txt", self.run))
    }
    /// Directory of per-round step artifacts.
    pub fn steps_path(&self) -> PathBuf {
        self.output.join(format!("{}_steps", self.run))
    }
    /// Echo the run settings before any work starts.
    pub fn log(&self) {
        log::info!("{:<32}{}", "run", self.run);
        log::info!("{:<32}{}", "rounds", self.rounds);
        log::info!("{:<32}{}", "steps", self.steps);
        log::info!("{:<32}{:.6}", "tolerance", self.tolerance);
        log::info!("{:<32}{:.6}", "min improvement probability", self.min_improve);
        log::info!("{:<32}{}", "trial budget", self.trial_budget);
        log::info!("{:<32}{}", "samples per candidate", self.samples_per_candidate);
        log::info!("{:<32}{:.6}", "neighbor variance", self.neighbor_variance);
        log::info!("{:<32}{}", "verification samples", self.extra_samples);
        log::info!("{:<32}{}..={}", "confirmation trials", self.confirm_min, self.confirm_max);
        log::info!("{:<32}{:.6}", "early stop level", self.early_stop);
        log::info!("{:<32}{}", "workers", self.workers);
    }
}
