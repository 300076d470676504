use super::*;
use crate::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

/// Empirical strategy pool for the player under test, one per round.
///
/// Step 0 is played against a fixed opponent mixture with a known
/// equilibrium payoff. Each accepted deviation joins the round's pool and its
/// verified payoff becomes the baseline of the following step. With a root
/// directory, every settled step is written to
/// `round-NNNN/step-NNNN.json`, and those files are what [`Arena::recall`]
/// replays when a round is resumed.
#[derive(Debug)]
pub struct Pool {
    opponent: MixedStrategy,
    initial: Utility,
    root: Option<PathBuf>,
    settled: Mutex<BTreeMap<(usize, usize), Verdict>>,
    members: Mutex<BTreeMap<usize, Vec<String>>>,
}

impl Pool {
    pub fn new(opponent: MixedStrategy, initial: Utility) -> Self {
        Self {
            opponent,
            initial,
            root: None,
            settled: Mutex::new(BTreeMap::new()),
            members: Mutex::new(BTreeMap::new()),
        }
    }
    /// Persist and replay step artifacts under `root`.
    pub fn persisted(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
    /// Artifact path of a step, when persisted.
    pub fn path(&self, round: usize, step: usize) -> Option<PathBuf> {
        self.root.as_ref().map(|root| {
            root.join(format!("round-{:04}", round))
                .join(format!("step-{:04}.json", step))
        })
    }
    /// Strategies added to a round's pool, in order of acceptance.
    pub fn members(&self, round: usize) -> Vec<String> {
        lock(&self.members).get(&round).cloned().unwrap_or_default()
    }
    fn load(&self, round: usize, step: usize) -> Result<Option<Verdict>, Error> {
        match self.path(round, step) {
            Some(ref path) if path.exists() => {
                log::debug!("{:<32}{}", "loading     step artifact", path.display());
                let verdict = serde_json::from_str::<Verdict>(&std::fs::read_to_string(path)?)?;
                Ok(Some(verdict))
            }
            _ => Ok(None),
        }
    }
    fn save(&self, round: usize, step: usize, verdict: &Verdict) -> Result<(), Error> {
        let Some(ref path) = self.path(round, step) else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        log::debug!("{:<32}{}", "saving      step artifact", path.display());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => Error::Collision(path.clone()),
                _ => Error::Io(e),
            })?;
        file.write_all(serde_json::to_string_pretty(verdict)?.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl Arena for Pool {
    fn baseline(&self, round: usize, step: usize) -> Result<Utility, Error> {
        match step {
            0 => Ok(self.initial),
            s => match self.recall(round, s - 1)? {
                Some(Verdict::Deviated(deviation)) => Ok(deviation.payoff),
                _ => Err(Error::Missing(format!(
                    "round {} step {} has no accepted deviation to build on",
                    round,
                    s - 1
                ))),
            },
        }
    }
    fn opponent(&self, _: usize, _: usize) -> Result<MixedStrategy, Error> {
        Ok(self.opponent.clone())
    }
    fn recall(&self, round: usize, step: usize) -> Result<Option<Verdict>, Error> {
        if let Some(verdict) = lock(&self.settled).get(&(round, step)) {
            return Ok(Some(verdict.clone()));
        }
        let loaded = self.load(round, step)?;
        if let Some(ref verdict) = loaded {
            lock(&self.settled).insert((round, step), verdict.clone());
        }
        Ok(loaded)
    }
    fn settle(&self, round: usize, step: usize, verdict: &Verdict, expand: bool) -> Result<(), Error> {
        self.save(round, step, verdict)?;
        lock(&self.settled).insert((round, step), verdict.clone());
        if let (true, Some(deviation)) = (expand, verdict.deviation()) {
            let name = deviation.params.name();
            log::debug!("{:<32}{:<8}{}", "expanding   pool", round, name);
            lock(&self.members).entry(round).or_default().push(name);
        }
        Ok(())
    }
}

/// Poisoning only means another round panicked; the map itself is intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deviated(x: f64, payoff: Utility) -> Verdict {
        Verdict::Deviated(Deviation {
            params: Params::try_from(vec![x, 0.5, 0.5]).unwrap(),
            payoff,
        })
    }

    #[test]
    fn baselines_follow_accepted_deviations() {
        let pool = Pool::new(MixedStrategy::pure("att0"), 0.25);
        assert_eq!(pool.baseline(0, 0).unwrap(), 0.25);
        assert!(matches!(pool.baseline(0, 1), Err(Error::Missing(_))));
        pool.settle(0, 0, &deviated(0.4, 0.4), true).unwrap();
        assert_eq!(pool.baseline(0, 1).unwrap(), 0.4);
        assert!(matches!(pool.baseline(1, 1), Err(Error::Missing(_))));
        assert_eq!(pool.members(0).len(), 1);
        assert!(pool.members(1).is_empty());
    }

    #[test]
    fn final_step_does_not_expand() {
        let pool = Pool::new(MixedStrategy::pure("att0"), 0.25);
        pool.settle(3, 2, &deviated(0.4, 0.4), false).unwrap();
        assert!(pool.members(3).is_empty());
        assert!(pool.recall(3, 2).unwrap().is_some());
    }

    #[test]
    fn persisted_steps_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let first = Pool::new(MixedStrategy::pure("att0"), 0.25).persisted(dir.path());
        first.settle(2, 0, &deviated(0.6, 0.6), true).unwrap();
        first.settle(2, 1, &Verdict::Confirmed, false).unwrap();
        assert!(dir.path().join("round-0002").join("step-0000.json").exists());
        let second = Pool::new(MixedStrategy::pure("att0"), 0.25).persisted(dir.path());
        assert_eq!(second.recall(2, 0).unwrap(), Some(deviated(0.6, 0.6)));
        assert_eq!(second.recall(2, 1).unwrap(), Some(Verdict::Confirmed));
        assert_eq!(second.recall(2, 2).unwrap(), None);
        assert_eq!(second.baseline(2, 1).unwrap(), 0.6);
    }

    #[test]
    fn refuses_to_overwrite_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let first = Pool::new(MixedStrategy::pure("att0"), 0.25).persisted(dir.path());
        first.settle(0, 0, &Verdict::Confirmed, false).unwrap();
        let second = Pool::new(MixedStrategy::pure("att0"), 0.25).persisted(dir.path());
        assert!(matches!(
            second.settle(0, 0, &Verdict::Confirmed, false),
            Err(Error::Collision(_))
        ));
    }
}
