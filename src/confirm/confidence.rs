use crate::*;
use statrs::distribution::Beta;
use statrs::distribution::ContinuousCDF;

/// Running tally of confirmation trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confidence {
    trials: usize,
    beneficial: usize,
}

impl Confidence {
    pub fn observe(&mut self, beneficial: bool) {
        self.trials += 1;
        self.beneficial += beneficial as usize;
    }
    pub fn trials(&self) -> usize {
        self.trials
    }
    pub fn beneficial(&self) -> usize {
        self.beneficial
    }
    /// Observed success rate; zero before any trial.
    pub fn rate(&self) -> Probability {
        match self.trials {
            0 => 0.,
            n => self.beneficial as Probability / n as Probability,
        }
    }
    /// Lower end of the two-sided `1 - alpha` Clopper–Pearson interval.
    pub fn lower(&self, alpha: Probability) -> Result<Probability, Error> {
        clopper_pearson_lower(self.beneficial, self.trials, alpha)
    }
}

/// Exact binomial lower confidence bound: the `alpha / 2` quantile of
/// `Beta(x, n - x + 1)`, or 0 when there are no successes.
pub fn clopper_pearson_lower(successes: usize, trials: usize, alpha: Probability) -> Result<Probability, Error> {
    if trials == 0 {
        return Err(Error::Statistics("no trials observed".into()));
    }
    if successes > trials {
        return Err(Error::Statistics(format!("{} successes in {} trials", successes, trials)));
    }
    if !(alpha > 0. && alpha < 1.) {
        return Err(Error::Statistics(format!("interval error level {} outside (0, 1)", alpha)));
    }
    if successes == 0 {
        return Ok(0.);
    }
    let beta = Beta::new(successes as f64, (trials - successes + 1) as f64)
        .map_err(|e| Error::Statistics(e.to_string()))?;
    Ok(beta.inverse_cdf(alpha / 2.))
}
