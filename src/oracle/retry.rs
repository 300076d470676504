use super::*;
use crate::*;
use rand::RngCore;
use std::time::Duration;

/// Bounded retry with exponential backoff around a collaborator.
///
/// Only transient failures ([`Error::Unavailable`]) are retried; everything
/// else, and the last transient failure once `retries` are spent, is returned
/// as is. Backoff doubles per attempt, capped at [`RETRY_BACKOFF_MAX`].
#[derive(Debug, Clone)]
pub struct Retry<T> {
    inner: T,
    retries: usize,
    backoff: Duration,
}

impl<T> Retry<T> {
    pub fn new(inner: T, retries: usize, backoff: Duration) -> Self {
        Self {
            inner,
            retries,
            backoff,
        }
    }
    pub fn inner(&self) -> &T {
        &self.inner
    }
    fn delay(&self, attempt: usize) -> Duration {
        self.backoff
            .saturating_mul(1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX))
            .min(RETRY_BACKOFF_MAX)
    }
    fn attempt<R>(&self, what: &str, mut call: impl FnMut() -> Result<R, Error>) -> Result<R, Error> {
        let mut attempt = 0;
        loop {
            match call() {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    let delay = self.delay(attempt);
                    log::warn!("{:<32}{:<16}retry {} of {} in {:?}", what, e, attempt + 1, self.retries, delay);
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

impl<T> BestResponse for Retry<T>
where
    T: BestResponse,
{
    fn search(&self, opponent: &MixedStrategy, search: &Search, rng: &mut dyn RngCore) -> Result<Trial, Error> {
        self.attempt("oracle unavailable", || self.inner.search(opponent, search, rng))
    }
}

impl<T> Evaluator for Retry<T>
where
    T: Evaluator,
{
    fn evaluate(
        &self,
        candidate: &Params,
        opponent: &MixedStrategy,
        samples: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Utility, Error> {
        self.attempt("evaluator unavailable", || {
            self.inner.evaluate(candidate, opponent, samples, rng)
        })
    }
}
