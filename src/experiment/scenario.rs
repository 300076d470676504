use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// A self-contained game to test against: the opponent's equilibrium
/// mixture, the tested player's equilibrium payoff, and the noisy payoff
/// landscape both the annealer and the verifier sample from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub opponent: MixedStrategy,
    pub baseline: Utility,
    pub dimension: usize,
    pub temperature: Utility,
    pub surface: Surface,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            opponent: MixedStrategy::uniform(["att0", "att1"]).unwrap_or_else(|_| MixedStrategy::pure("att0")),
            baseline: 0.5,
            dimension: DIMENSION,
            temperature: ANNEALING_TEMPERATURE,
            surface: Surface::default(),
        }
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), Error> {
        if self.dimension == 0 {
            return Err(Error::Config("strategy dimension must be positive".into()));
        }
        if !self.baseline.is_finite() {
            return Err(Error::Config(format!("baseline payoff {} is not finite", self.baseline)));
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.) {
            return Err(Error::Config(format!("annealing temperature {} is invalid", self.temperature)));
        }
        if !(self.surface.noise.is_finite() && self.surface.noise >= 0.) {
            return Err(Error::Config(format!("surface noise {} is invalid", self.surface.noise)));
        }
        if let Some(name) = self.opponent.support().find(|name| !self.surface.peaks.contains_key(*name)) {
            return Err(Error::Config(format!("no payoff data for opponent {}", name)));
        }
        match self
            .surface
            .peaks
            .values()
            .flatten()
            .find(|peak| peak.center.dimension() != self.dimension)
        {
            Some(peak) => Err(Error::Config(format!(
                "peak at {} does not have dimension {}",
                peak.center, self.dimension
            ))),
            None => Ok(()),
        }
    }
    pub fn oracle(&self) -> Annealer<Surface> {
        Annealer::new(self.surface.clone(), self.dimension).with_temperature(self.temperature)
    }
    pub fn evaluator(&self) -> Surface {
        self.surface.clone()
    }
    pub fn arena(&self, steps: impl Into<PathBuf>) -> Pool {
        Pool::new(self.opponent.clone(), self.baseline).persisted(steps)
    }
}

/// The reference experiment: annealing oracle and noisy surface, both
/// wrapped in the configured retry policy.
pub type Reference = Experiment<Retry<Annealer<Surface>>, Retry<Surface>, Pool>;

impl Reference {
    pub fn reference(config: Config) -> Self {
        let ref scenario = config.scenario;
        let oracle = Retry::new(scenario.oracle(), config.retries, config.backoff());
        let evaluator = Retry::new(scenario.evaluator(), config.retries, config.backoff());
        let arena = scenario.arena(config.steps_path());
        Experiment::new(config, oracle, evaluator, arena)
    }
}
