use crate::*;

/// Rounding slack of the closed form, in trials.
const BOUNDARY_STEPS: usize = 4;

/// Smallest `n` such that `(1 - min_improve)^n <= alpha`.
///
/// If every oracle trial independently finds an improving deviation with
/// probability at least `min_improve`, then `n` straight failures happen
/// with probability at most `alpha`. Both arguments must lie in `(0, 1]`.
pub fn required_trials(min_improve: Probability, alpha: Probability) -> Result<usize, Error> {
    if !(min_improve > 0. && min_improve <= 1.) {
        return Err(Error::Config(format!(
            "minimum improvement probability {} must lie in (0, 1]",
            min_improve
        )));
    }
    if !(alpha > 0. && alpha <= 1.) {
        return Err(Error::Config(format!("step tolerance {} must lie in (0, 1]", alpha)));
    }
    let miss = 1. - min_improve;
    if miss == 1. {
        return Err(Error::Config(format!(
            "minimum improvement probability {} is too small to bound the trial count",
            min_improve
        )));
    }
    let estimate = (alpha.ln() / (-min_improve).ln_1p()).ceil().max(0.);
    if !(estimate < usize::MAX as f64) {
        return Err(Error::Config(format!(
            "step tolerance {} needs more trials than can be counted at p = {}",
            alpha, min_improve
        )));
    }
    let escape = |n: usize| miss.powf(n as f64);
    // closed form first, then correct for rounding at the boundary
    let mut n = estimate as usize;
    for _ in 0..BOUNDARY_STEPS {
        match escape(n) > alpha {
            true => n += 1,
            false => break,
        }
    }
    for _ in 0..BOUNDARY_STEPS {
        match n > 0 && escape(n - 1) <= alpha {
            true => n -= 1,
            false => break,
        }
    }
    Ok(n)
}
