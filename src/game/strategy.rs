use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Opponent mixture over a pool of named pure strategies.
///
/// Immutable once built; total mass is 1 within [`PROBABILITY_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Probability>", into = "BTreeMap<String, Probability>")]
pub struct MixedStrategy(BTreeMap<String, Probability>);

impl MixedStrategy {
    /// All mass on a single strategy.
    pub fn pure(name: impl Into<String>) -> Self {
        Self(BTreeMap::from([(name.into(), 1.)]))
    }
    /// Uniform mixture over the given names.
    pub fn uniform<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<String>>();
        let mass = 1. / names.len().max(1) as Probability;
        Self::try_from(names.into_iter().map(|n| (n, mass)).collect::<BTreeMap<_, _>>())
    }
    pub fn probability(&self, name: &str) -> Probability {
        self.0.get(name).copied().unwrap_or(0.)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, Probability)> {
        self.0.iter().map(|(name, &p)| (name.as_str(), p))
    }
    /// Strategies played with positive probability.
    pub fn support(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, p)| *p > 0.).map(|(name, _)| name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Probability>> for MixedStrategy {
    type Error = Error;
    fn try_from(weights: BTreeMap<String, Probability>) -> Result<Self, Self::Error> {
        if weights.is_empty() {
            return Err(Error::Config("mixed strategy has no support".into()));
        }
        if let Some((name, p)) = weights.iter().find(|(_, p)| !(0.0..=1.0).contains(*p)) {
            return Err(Error::Config(format!("probability of {} is {}, outside [0, 1]", name, p)));
        }
        let total = weights.values().sum::<Probability>();
        if (total - 1.).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(Error::Config(format!("mixed strategy sums to {:.6}, not 1", total)));
        }
        Ok(Self(weights))
    }
}

impl From<MixedStrategy> for BTreeMap<String, Probability> {
    fn from(strategy: MixedStrategy) -> Self {
        strategy.0
    }
}

impl std::fmt::Display for MixedStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .iter()
            .map(|(name, p)| format!("{}:{:.3}", name, p))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{{{}}}", terms)
    }
}
