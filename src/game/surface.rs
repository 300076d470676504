use crate::*;
use rand::RngCore;
use rand_distr::Distribution;
use rand_distr::Normal;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Gaussian bump of payoff centered somewhere in the unit cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub center: Params,
    pub height: Utility,
    pub width: f64,
}

impl Peak {
    fn value(&self, point: &Params) -> Utility {
        self.height * (-point.distance(&self.center) / (2. * self.width * self.width)).exp()
    }
}

/// Noisy synthetic payoff landscape for the player under test.
///
/// Against each pure opponent strategy the payoff of a point is the highest
/// of that strategy's peaks; against a mixture it is the mixture-weighted
/// sum. Each sample adds Gaussian noise with standard deviation `noise`,
/// so an estimate over `n` samples has error shrinking like `1/√n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub peaks: BTreeMap<String, Vec<Peak>>,
    pub noise: f64,
}

impl Surface {
    /// Noiseless payoff against a mixed strategy.
    pub fn expected(&self, point: &Params, opponent: &MixedStrategy) -> Result<Utility, Error> {
        opponent
            .iter()
            .map(|(name, p)| {
                self.peaks
                    .get(name)
                    .ok_or_else(|| Error::Evaluator(format!("no payoff data for opponent {}", name)))
                    .map(|peaks| {
                        p * peaks
                            .iter()
                            .map(|peak| peak.value(point))
                            .fold(0., Utility::max)
                    })
            })
            .sum()
    }
}

impl Evaluator for Surface {
    fn evaluate(
        &self,
        candidate: &Params,
        opponent: &MixedStrategy,
        samples: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Utility, Error> {
        if samples == 0 {
            return Err(Error::Config("payoff estimate needs at least one sample".into()));
        }
        let mean = self.expected(candidate, opponent)?;
        if self.noise == 0. {
            return Ok(mean);
        }
        let noise = Normal::new(0., self.noise)
            .map_err(|e| Error::Config(format!("surface noise {}: {}", self.noise, e)))?;
        Ok(mean + (0..samples).map(|_| noise.sample(rng)).sum::<Utility>() / samples as Utility)
    }
}

impl Default for Surface {
    /// Two attacker strategies, each with a broad low peak and a narrow high one.
    fn default() -> Self {
        let peak = |c: [f64; DIMENSION], height, width| Peak {
            center: Params::try_from(c.to_vec()).unwrap_or_else(|_| Params::center(DIMENSION)),
            height,
            width,
        };
        Self {
            peaks: BTreeMap::from([
                (
                    "att0".to_string(),
                    vec![peak([0.2, 0.3, 0.5], 0.6, 0.35), peak([0.8, 0.7, 0.2], 1.0, 0.12)],
                ),
                (
                    "att1".to_string(),
                    vec![peak([0.5, 0.5, 0.5], 0.5, 0.40), peak([0.7, 0.8, 0.3], 0.9, 0.15)],
                ),
            ]),
            noise: 0.1,
        }
    }
}
