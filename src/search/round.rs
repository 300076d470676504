use super::*;
use crate::*;
use rand::RngCore;
use std::time::Duration;
use std::time::Instant;

/// Sequential deviation search over the steps of one round.
///
/// At step `s` the loop draws up to `budget.trials(s)` verified oracle trials
/// and accepts the first whose payoff strictly beats the step's baseline.
/// A step whose whole budget fails confirms the round; a round that keeps
/// finding deviations stops at the budget's step limit. Steps with an
/// existing artifact are replayed from the [`Arena`] without oracle calls.
/// A timed-out trial counts as a failure, but once the round clock expires
/// the round fails with [`Error::Timeout`] and the interrupted step is left
/// unsettled, to be searched again on resume.
pub struct DeviationSearch<'a, O, E, A> {
    probe: Probe<'a, O, E>,
    arena: &'a A,
    budget: &'a Budget,
    limit: Option<Duration>,
}

impl<'a, O, E, A> DeviationSearch<'a, O, E, A>
where
    O: BestResponse,
    E: Evaluator,
    A: Arena,
{
    pub fn new(probe: Probe<'a, O, E>, arena: &'a A, budget: &'a Budget) -> Self {
        Self {
            probe,
            arena,
            budget,
            limit: None,
        }
    }
    /// Wall-clock limit on the whole round.
    pub fn with_limit(mut self, limit: Option<Duration>) -> Self {
        self.limit = limit;
        self
    }
    pub fn run(&self, round: usize, rng: &mut dyn RngCore) -> Result<Report, Error> {
        self.run_within(round, &Deadline::start(self.limit), rng)
    }
    /// Runs the round against an externally started clock.
    pub fn run_within(&self, round: usize, clock: &Deadline, rng: &mut dyn RngCore) -> Result<Report, Error> {
        let mut phase = Phase::Searching(0);
        let mut steps = Vec::new();
        let mut sequence = Sequence::default();
        let mut baseline = self.arena.baseline(round, 0)?;
        let mut opponent = self.arena.opponent(round, 0)?;
        while let Phase::Searching(step) = phase {
            log::info!("{:<32}{:<16}{:<16}", "testing     deviation", format!("round {}", round), format!("step {}", step));
            baseline = self.arena.baseline(round, step)?;
            opponent = self.arena.opponent(round, step)?;
            let record = match self.arena.recall(round, step)? {
                Some(verdict) => {
                    log::info!("{:<32}{:<16}{:<16}", "skipping    settled step", format!("round {}", round), format!("step {}", step));
                    Step {
                        index: step,
                        baseline,
                        verdict,
                        trials: 0,
                        timeouts: 0,
                        replayed: true,
                    }
                }
                None => self.step(round, step, baseline, &opponent, clock, rng)?,
            };
            phase = match record.deviation() {
                None => Phase::Confirmed(step),
                Some(params) => {
                    sequence.push(params.clone());
                    match step + 1 < self.budget.steps() {
                        true => Phase::Searching(step + 1),
                        false => Phase::FoundDeviation(step),
                    }
                }
            };
            steps.push(record);
        }
        log::info!("{:<32}{:<16}{:<16}", "finished    search", format!("round {}", round), phase);
        Ok(Report {
            round,
            phase,
            steps,
            sequence,
            baseline,
            opponent,
        })
    }
    fn step(
        &self,
        round: usize,
        step: usize,
        baseline: Utility,
        opponent: &MixedStrategy,
        clock: &Deadline,
        rng: &mut dyn RngCore,
    ) -> Result<Step, Error> {
        let n = self.budget.trials(step)?;
        let verbose = self.probe.search().verbose;
        let start = Instant::now();
        log::debug!("{:<32}{:<8}α {:<12.6}baseline {:.4}", "allotting   trials", n, self.budget.alpha(step), baseline);
        let mut trials = 0;
        let mut timeouts = 0;
        let mut verdict = Verdict::Confirmed;
        for t in 0..n {
            // a step cut short by the round clock is never settled
            if clock.expired() {
                log::warn!("{:<32}{:<16}{} of {} trials unused", "round       timed out", format!("round {}", round), n - t, n);
                return Err(Error::Timeout(clock.elapsed()));
            }
            trials += 1;
            match self.probe.run(opponent, rng) {
                Ok(verified) if verified.beats(baseline) => {
                    log::info!(
                        "{:<32}{:<16}verified {:.4} > baseline {:.4} after {} of {} trials",
                        "found       deviation",
                        format!("step {}", step),
                        verified.payoff,
                        baseline,
                        t + 1,
                        n
                    );
                    verdict = Verdict::Deviated(Deviation {
                        params: verified.trial.params,
                        payoff: verified.payoff,
                    });
                    break;
                }
                Ok(verified) if verbose => log::info!(
                    "{:<32}{:<8}estimate {:.4}  verified {:.4}  baseline {:.4}",
                    "no improvement",
                    t,
                    verified.trial.estimate,
                    verified.payoff,
                    baseline
                ),
                Ok(verified) => log::debug!("{:<32}{:<8}verified {:.4}", "no improvement", t, verified.payoff),
                Err(e) if e.is_timeout() => {
                    log::warn!("{:<32}{:<8}{}", "trial       timed out", t, e);
                    timeouts += 1;
                }
                Err(e) => return Err(e),
            }
        }
        log::info!("{:<32}{:?}", "trials      elapsed", start.elapsed());
        let expand = verdict.deviation().is_some() && step + 1 < self.budget.steps();
        self.arena.settle(round, step, &verdict, expand)?;
        if verdict.deviation().is_none() {
            log::info!("{:<32}{:<16}{:<16}", "confirmed   equilibrium", format!("round {}", round), format!("step {}", step));
        }
        Ok(Step {
            index: step,
            baseline,
            verdict,
            trials,
            timeouts,
            replayed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::fake::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pool() -> Pool {
        Pool::new(opponent(), 0.5)
    }

    fn run(oracle: &Scripted, arena: &Pool, budget: &Budget, round: usize) -> Report {
        let ref mut rng = SmallRng::seed_from_u64(round as u64);
        let ref search = search();
        let probe = Probe::new(oracle, &Echo, search, 3, None);
        DeviationSearch::new(probe, arena, budget).run(round, rng).unwrap()
    }

    #[test]
    fn never_improving_oracle_confirms_at_first_step() {
        let budget = Budget::from_alphas(vec![0.1, 0.1, 0.1], 0.2).unwrap();
        let oracle = Scripted::flat();
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.phase, Phase::Confirmed(0));
        assert!(report.confirmed());
        assert!(report.sequence.is_empty());
        assert_eq!(oracle.calls(), required_trials(0.2, 0.1).unwrap());
        assert_eq!(report.trials(), 11);
    }

    #[test]
    fn ties_are_not_improvements() {
        let budget = Budget::from_alphas(vec![0.2], 0.2).unwrap();
        let oracle = Scripted::new(&[0.5]);
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.phase, Phase::Confirmed(0));
        assert_eq!(oracle.calls(), 8);
    }

    #[test]
    fn accepts_first_improvement_only() {
        let budget = Budget::from_alphas(vec![0.2, 0.2], 0.2).unwrap();
        // 0.5 ties the step 0 baseline, 0.6 is the first strict improvement
        let oracle = Scripted::new(&[0.1, 0.5, 0.6, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.steps[0].trials, 3);
        assert_eq!(report.steps[0].deviation().unwrap().coords()[0], 0.6);
        assert_eq!(report.steps[1].baseline, 0.6);
        // 0.9 beats 0.6 at the first call of step 1, round hits the step limit
        assert_eq!(report.phase, Phase::FoundDeviation(1));
        assert_eq!(report.sequence.len(), 2);
        assert_eq!(oracle.calls(), 4);
        assert!(!report.confirmed());
    }

    #[test]
    fn step_limit_bounds_work() {
        let budget = Budget::from_alphas(vec![0.2; 3], 0.2).unwrap();
        let oracle = Scripted::new(&[0.6, 0.7, 0.8, 0.9]);
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.phase, Phase::FoundDeviation(2));
        assert_eq!(report.sequence.len(), 3);
        assert_eq!(report.baseline, 0.7);
        assert_eq!(oracle.calls(), 3);
    }

    #[test]
    fn confirms_after_deviations() {
        let budget = Budget::from_alphas(vec![0.2; 3], 0.2).unwrap();
        let oracle = Scripted::new(&[0.8, 0.1]);
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.phase, Phase::Confirmed(1));
        assert_eq!(report.sequence.len(), 1);
        assert_eq!(report.baseline, 0.8);
        assert_eq!(oracle.calls(), 1 + 8);
    }

    #[test]
    fn rerun_replays_without_oracle_calls() {
        let budget = Budget::from_alphas(vec![0.2; 3], 0.2).unwrap();
        let arena = pool();
        let first = Scripted::new(&[0.1, 0.6, 0.2, 0.7, 0.0]);
        let before = run(&first, &arena, &budget, 4);
        let second = Scripted::new(&[0.99]);
        let after = run(&second, &arena, &budget, 4);
        assert_eq!(second.calls(), 0);
        assert_eq!(before.sequence, after.sequence);
        assert_eq!(before.phase, after.phase);
        assert!(after.steps.iter().all(|s| s.replayed));
    }

    #[test]
    fn rerun_from_disk_replays_without_oracle_calls() {
        let dir = tempfile::tempdir().unwrap();
        let budget = Budget::from_alphas(vec![0.2; 3], 0.2).unwrap();
        let first = Scripted::new(&[0.6, 0.7, 0.8]);
        let before = run(&first, &pool().persisted(dir.path()), &budget, 1);
        let second = Scripted::new(&[0.99]);
        let after = run(&second, &pool().persisted(dir.path()), &budget, 1);
        assert_eq!(second.calls(), 0);
        assert_eq!(before.sequence, after.sequence);
        assert_eq!(after.phase, Phase::FoundDeviation(2));
    }

    #[test]
    fn rounds_do_not_share_steps() {
        let budget = Budget::from_alphas(vec![0.2; 2], 0.2).unwrap();
        let arena = pool();
        let oracle = Scripted::new(&[0.6, 0.7]);
        run(&oracle, &arena, &budget, 0);
        let fresh = Scripted::new(&[0.0]);
        let report = run(&fresh, &arena, &budget, 1);
        assert_eq!(fresh.calls(), 8);
        assert!(report.confirmed());
    }

    #[test]
    fn timed_out_trials_count_as_failures() {
        let budget = Budget::from_alphas(vec![0.2], 0.2).unwrap();
        // the improving candidate arrives on a call that times out
        let oracle = Scripted::new(&[0.9]).with_timeouts(&[0, 1, 2, 3, 4, 5, 6, 7]);
        let report = run(&oracle, &pool(), &budget, 0);
        assert_eq!(report.phase, Phase::Confirmed(0));
        assert_eq!(report.timeouts(), 8);
    }

    #[test]
    fn expired_round_aborts_without_settling() {
        let budget = Budget::from_alphas(vec![0.2], 0.2).unwrap();
        let oracle = Scripted::new(&[0.9]);
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ref search = search();
        let probe = Probe::new(&oracle, &Echo, search, 3, None);
        let clock = Deadline::start(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        let arena = pool();
        let result = DeviationSearch::new(probe, &arena, &budget).run_within(0, &clock, rng);
        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(oracle.calls(), 0);
        assert_eq!(arena.recall(0, 0).unwrap(), None);
    }

    #[test]
    fn step_cut_short_leaves_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let budget = Budget::from_alphas(vec![0.2], 0.2).unwrap();
        let oracle = Scripted::flat().with_delay(Duration::from_millis(5));
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ref search = search();
        let probe = Probe::new(&oracle, &Echo, search, 3, None);
        let arena = pool().persisted(dir.path());
        let result = DeviationSearch::new(probe, &arena, &budget)
            .with_limit(Some(Duration::from_millis(1)))
            .run(0, rng);
        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(oracle.calls(), 1);
        assert!(!arena.path(0, 0).unwrap().exists());
        let resumed = pool().persisted(dir.path());
        assert_eq!(resumed.recall(0, 0).unwrap(), None);
    }

    #[test]
    fn collaborator_failures_are_fatal() {
        let budget = Budget::from_alphas(vec![0.2], 0.2).unwrap();
        let ref mut rng = SmallRng::seed_from_u64(0);
        let ref search = search();
        let probe = Probe::new(&Broken, &Echo, search, 3, None);
        let result = DeviationSearch::new(probe, &pool(), &budget).run(0, rng);
        assert!(matches!(result, Err(Error::Oracle(_))));
    }
}
