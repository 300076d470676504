use crate::*;

/// Splits a total false-negative tolerance uniformly across testing steps.
///
/// This is a union bound over steps: conservative, and blind to the
/// adaptive stopping of the round loop. Each share is `total / steps`.
pub fn allocate_tolerance(total: Probability, steps: usize) -> Result<Vec<Probability>, Error> {
    if !total.is_finite() || total < 0. {
        return Err(Error::Config(format!("tolerance {} must be finite and >= 0", total)));
    }
    if steps == 0 {
        return Err(Error::Config("tolerance must be split across at least one step".into()));
    }
    Ok(vec![total / steps as Probability; steps])
}
