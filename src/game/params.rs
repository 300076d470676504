use crate::*;
use rand::Rng;
use rand::RngCore;
use rand_distr::Distribution;
use rand_distr::Normal;
use serde::Deserialize;
use serde::Serialize;

/// Normalized deviating strategy: a point in the unit cube `[0, 1]^d`.
///
/// The oracle searches in this space; materializing a point into a concrete
/// game action is done through [`Params::denormalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Params(Vec<f64>);

impl Params {
    /// Center of the unit cube.
    pub fn center(dimension: usize) -> Self {
        Self(vec![0.5; dimension])
    }
    /// Uniform point in the unit cube.
    pub fn random(dimension: usize, rng: &mut dyn RngCore) -> Self {
        Self((0..dimension).map(|_| rng.random::<f64>()).collect())
    }
    pub fn dimension(&self) -> usize {
        self.0.len()
    }
    pub fn coords(&self) -> &[f64] {
        &self.0
    }
    /// Gaussian neighbor with per-coordinate `variance`, clamped to the cube.
    pub fn perturb(&self, variance: f64, rng: &mut dyn RngCore) -> Result<Self, Error> {
        let noise = Normal::new(0., variance.sqrt())
            .map_err(|e| Error::Config(format!("neighbor variance {}: {}", variance, e)))?;
        Ok(Self(
            self.0
                .iter()
                .map(|x| (x + noise.sample(rng)).clamp(0., 1.))
                .collect(),
        ))
    }
    /// Squared Euclidean distance.
    pub fn distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
    /// Affine map from the unit cube onto concrete `(lo, hi)` parameter ranges.
    pub fn denormalize(&self, bounds: &[(f64, f64)]) -> Result<Vec<f64>, Error> {
        if bounds.len() != self.dimension() {
            return Err(Error::Config(format!(
                "{} bounds for a {}-dimensional strategy",
                bounds.len(),
                self.dimension()
            )));
        }
        Ok(self
            .0
            .iter()
            .zip(bounds)
            .map(|(x, (lo, hi))| lo + x * (hi - lo))
            .collect())
    }
    /// Stable identifier for the materialized strategy.
    pub fn name(&self) -> String {
        let coords = self
            .0
            .iter()
            .map(|x| format!("{:.4}", x))
            .collect::<Vec<_>>()
            .join("_");
        format!("dev_{}", coords)
    }
}

impl TryFrom<Vec<f64>> for Params {
    type Error = Error;
    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        if coords.is_empty() {
            return Err(Error::Config("parameter vector is empty".into()));
        }
        if let Some(x) = coords.iter().find(|x| !(0.0..=1.0).contains(*x)) {
            return Err(Error::Config(format!("parameter {} outside [0, 1]", x)));
        }
        Ok(Self(coords))
    }
}

impl From<Params> for Vec<f64> {
    fn from(params: Params) -> Self {
        params.0
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coords = self
            .0
            .iter()
            .map(|x| format!("{:.3}", x))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{}]", coords)
    }
}
