use crate::*;
use rand::Rng;
use rand::RngCore;

/// Simulated annealing over the unit cube, scoring candidates by sampling.
///
/// Each call is one independent trial: start from the given point (or a
/// uniform random one), propose Gaussian neighbors, accept by the Metropolis
/// rule under a linearly cooling temperature, and return the best candidate
/// seen with its sampled estimate. Once the temperature drops below
/// [`DONE_TOLERANCE`] only improvements are accepted.
#[derive(Debug, Clone)]
pub struct Annealer<E> {
    evaluator: E,
    dimension: usize,
    temperature: Utility,
}

impl<E> Annealer<E> {
    pub fn new(evaluator: E, dimension: usize) -> Self {
        Self {
            evaluator,
            dimension,
            temperature: ANNEALING_TEMPERATURE,
        }
    }
    pub fn with_temperature(mut self, temperature: Utility) -> Self {
        self.temperature = temperature;
        self
    }
    fn temperature(&self, k: usize, budget: usize) -> Utility {
        self.temperature * (1. - k as Utility / budget as Utility)
    }
}

impl<E> BestResponse for Annealer<E>
where
    E: Evaluator,
{
    fn search(&self, opponent: &MixedStrategy, search: &Search, rng: &mut dyn RngCore) -> Result<Trial, Error> {
        if search.budget == 0 {
            return Err(Error::Config("annealing needs at least one candidate evaluation".into()));
        }
        let mut current = match search.initial {
            Some(ref p) if p.dimension() == self.dimension => p.clone(),
            Some(ref p) => {
                return Err(Error::Config(format!(
                    "initial point has dimension {}, game has {}",
                    p.dimension(),
                    self.dimension
                )));
            }
            None => Params::random(self.dimension, rng),
        };
        let mut value = self
            .evaluator
            .evaluate(&current, opponent, search.samples, rng)?;
        let mut best = Trial {
            params: current.clone(),
            estimate: value,
        };
        for k in 1..search.budget {
            let t = self.temperature(k, search.budget);
            let candidate = current.perturb(search.variance, rng)?;
            let score = self
                .evaluator
                .evaluate(&candidate, opponent, search.samples, rng)?;
            let accept = score >= value
                || (t > DONE_TOLERANCE && rng.random::<f64>() < ((score - value) / t).exp());
            if search.verbose {
                log::debug!(
                    "{:<32}{:<8}T {:<10.4}score {:<10.4}current {:<10.4}{}",
                    "annealing   candidate",
                    k,
                    t,
                    score,
                    value,
                    if accept { "accept" } else { "reject" }
                );
            }
            if accept {
                current = candidate;
                value = score;
            }
            if value > best.estimate {
                best = Trial {
                    params: current.clone(),
                    estimate: value,
                };
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn search(budget: usize) -> Search {
        Search {
            budget,
            samples: 1,
            variance: 0.01,
            initial: None,
            verbose: false,
        }
    }

    fn surface() -> Surface {
        Surface {
            noise: 0.,
            ..Surface::default()
        }
    }

    #[test]
    fn climbs_toward_a_peak() {
        let ref mut rng = SmallRng::seed_from_u64(42);
        let ref opponent = MixedStrategy::pure("att0");
        let annealer = Annealer::new(surface(), DIMENSION);
        let start = Params::try_from(vec![0.7, 0.6, 0.3]).unwrap();
        let before = surface().expected(&start, opponent).unwrap();
        let trial = annealer
            .search(opponent, &Search { initial: Some(start), ..search(400) }, rng)
            .unwrap();
        assert!(trial.estimate >= before);
        assert!((surface().expected(&trial.params, opponent).unwrap() - trial.estimate).abs() < 1e-9);
    }

    #[test]
    fn single_evaluation_returns_start() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let ref opponent = MixedStrategy::pure("att1");
        let start = Params::center(DIMENSION);
        let trial = Annealer::new(surface(), DIMENSION)
            .search(opponent, &Search { initial: Some(start.clone()), ..search(1) }, rng)
            .unwrap();
        assert_eq!(trial.params, start);
    }

    #[test]
    fn rejects_mismatched_start() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let start = Params::center(2);
        let result = Annealer::new(surface(), DIMENSION).search(
            &MixedStrategy::pure("att0"),
            &Search { initial: Some(start), ..search(5) },
            rng,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn rejects_empty_budget() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let result = Annealer::new(surface(), DIMENSION).search(&MixedStrategy::pure("att0"), &search(0), rng);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn evaluator_failures_surface() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let result = Annealer::new(surface(), DIMENSION).search(&MixedStrategy::pure("nobody"), &search(5), rng);
        assert!(matches!(result, Err(Error::Evaluator(_))));
    }
}
