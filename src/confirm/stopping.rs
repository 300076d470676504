use super::*;
use crate::*;

/// Stopping rule of the confirmation estimate.
///
/// Sampling always continues below `min` trials and always stops at `max`.
/// In between it stops as soon as the observed rate is at or below `level`,
/// or the Clopper–Pearson lower bound at [`CLOPPER_PEARSON_ALPHA`] is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stopping {
    min: usize,
    max: usize,
    level: Probability,
}

impl Stopping {
    pub fn new(min: usize, max: usize, level: Probability) -> Result<Self, Error> {
        if min < 1 {
            return Err(Error::Config("confirmation needs at least one trial".into()));
        }
        if max < min {
            return Err(Error::Config(format!("confirmation max trials {} below min {}", max, min)));
        }
        if !(level > 0. && level <= 1.) {
            return Err(Error::Config(format!("early stop level {} must lie in (0, 1]", level)));
        }
        Ok(Self { min, max, level })
    }
    pub fn min(&self) -> usize {
        self.min
    }
    pub fn max(&self) -> usize {
        self.max
    }
    pub fn level(&self) -> Probability {
        self.level
    }
    /// Whether another trial should be drawn given the tally so far.
    pub fn proceed(&self, tally: &Confidence) -> Result<bool, Error> {
        if tally.trials() < self.min {
            return Ok(true);
        }
        if tally.trials() >= self.max {
            return Ok(false);
        }
        if tally.rate() <= self.level {
            return Ok(false);
        }
        Ok(tally.lower(CLOPPER_PEARSON_ALPHA)? > self.level)
    }
}
