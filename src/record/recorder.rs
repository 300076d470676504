use super::*;
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// One finished round as written to `<results>.rounds/round-NNNN.json`.
#[derive(Debug, Serialize, Deserialize)]
struct Checkpoint {
    outcome: Outcome,
    deviations: Sequence,
}

/// Collects round outcomes and deviation sequences, then writes each output
/// file exactly once when the run ends.
///
/// Construction fails if either output already exists, so earlier results
/// are never silently overwritten; the final write also refuses to replace a
/// file that appeared in the meantime. With checkpoints enabled, every
/// finished round is additionally written to its own file under
/// `<results>.rounds/` as soon as it is pushed, and rounds found there at
/// startup are taken as already done.
#[derive(Debug)]
pub struct Recorder {
    results: PathBuf,
    deviations: PathBuf,
    checkpoints: Option<PathBuf>,
    rounds: BTreeMap<usize, (Outcome, Sequence)>,
}

impl Recorder {
    pub fn new(results: impl Into<PathBuf>, deviations: impl Into<PathBuf>) -> Result<Self, Error> {
        let results = results.into();
        let deviations = deviations.into();
        for path in [&results, &deviations] {
            if path.exists() {
                return Err(Error::Collision(path.clone()));
            }
        }
        Ok(Self {
            results,
            deviations,
            checkpoints: None,
            rounds: BTreeMap::new(),
        })
    }
    /// Also write each round as it finishes, resuming from the rounds a
    /// previous run already checkpointed.
    pub fn checkpointed(mut self) -> Result<Self, Error> {
        let mut dir = self.results.clone().into_os_string();
        dir.push(".rounds");
        let dir = PathBuf::from(dir);
        if dir.is_dir() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    let checkpoint = serde_json::from_str::<Checkpoint>(&std::fs::read_to_string(&path)?)?;
                    if self.rounds.contains_key(&checkpoint.outcome.round) {
                        return Err(Error::Claimed(checkpoint.outcome.round));
                    }
                    self.rounds.insert(checkpoint.outcome.round, (checkpoint.outcome, checkpoint.deviations));
                }
            }
            log::info!("{:<32}{} rounds from {}", "resuming    checkpoints", self.rounds.len(), dir.display());
        }
        self.checkpoints = Some(dir);
        Ok(self)
    }
    /// Whether a round's outcome is already held.
    pub fn contains(&self, round: usize) -> bool {
        self.rounds.contains_key(&round)
    }
    pub fn results(&self) -> &Path {
        &self.results
    }
    pub fn deviations(&self) -> &Path {
        &self.deviations
    }
    pub fn len(&self) -> usize {
        self.rounds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.rounds.values().map(|(outcome, _)| outcome)
    }
    pub fn push(&mut self, outcome: Outcome, sequence: Sequence) -> Result<(), Error> {
        if self.rounds.contains_key(&outcome.round) {
            return Err(Error::Claimed(outcome.round));
        }
        if let Some(ref dir) = self.checkpoints {
            std::fs::create_dir_all(dir)?;
            let ref path = dir.join(format!("round-{:04}.json", outcome.round));
            let checkpoint = Checkpoint {
                outcome,
                deviations: sequence.clone(),
            };
            let mut file = create(path)?;
            file.write_all(serde_json::to_string_pretty(&checkpoint)?.as_bytes())?;
            file.sync_all()?;
        }
        self.rounds.insert(outcome.round, (outcome, sequence));
        Ok(())
    }
    /// Writes both outputs, ordered by round index.
    pub fn finish(self) -> Result<Vec<Outcome>, Error> {
        log::info!("{:<32}{}", "saving      results", self.results.display());
        let mut file = BufWriter::new(create(&self.results)?);
        for (outcome, _) in self.rounds.values() {
            writeln!(file, "{}", outcome.row())?;
        }
        file.flush()?;
        log::info!("{:<32}{}", "saving      deviations", self.deviations.display());
        let mut file = BufWriter::new(create(&self.deviations)?);
        for (_, sequence) in self.rounds.values() {
            writeln!(file, "{}", serde_json::to_string(sequence)?)?;
        }
        file.flush()?;
        Ok(self.rounds.into_values().map(|(outcome, _)| outcome).collect())
    }
}

/// Create a file that must not exist yet.
fn create(path: &Path) -> Result<File, Error> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::Collision(path.to_path_buf()),
            _ => Error::Io(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(round: usize, confirmed: bool, probability: Probability) -> Outcome {
        Outcome {
            confirmed,
            round,
            probability,
        }
    }

    fn sequence(xs: &[f64]) -> Sequence {
        Sequence::from(
            xs.iter()
                .map(|&x| Params::try_from(vec![x, 0.5, 0.5]).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn refuses_existing_results() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("dg1_results.tsv");
        std::fs::write(&results, "old").unwrap();
        let result = Recorder::new(&results, dir.path().join("dg1_deviations.txt"));
        assert!(matches!(result, Err(Error::Collision(p)) if p == results));
        assert_eq!(std::fs::read_to_string(&results).unwrap(), "old");
    }

    #[test]
    fn refuses_existing_deviations() {
        let dir = tempfile::tempdir().unwrap();
        let deviations = dir.path().join("dg1_deviations.txt");
        std::fs::write(&deviations, "old").unwrap();
        assert!(matches!(
            Recorder::new(dir.path().join("dg1_results.tsv"), &deviations),
            Err(Error::Collision(_))
        ));
    }

    #[test]
    fn writes_rows_in_round_order() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("out").join("results.tsv");
        let deviations = dir.path().join("out").join("deviations.txt");
        let mut recorder = Recorder::new(&results, &deviations).unwrap();
        recorder.push(outcome(1, false, 0.5), sequence(&[0.25, 0.75])).unwrap();
        recorder.push(outcome(0, true, 0.0), sequence(&[])).unwrap();
        assert!(!results.exists());
        let outcomes = recorder.finish().unwrap();
        assert_eq!(outcomes.iter().map(|o| o.round).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(std::fs::read_to_string(&results).unwrap(), "true\t0\t0\nfalse\t1\t0.5\n");
        assert_eq!(
            std::fs::read_to_string(&deviations).unwrap(),
            "[]\n[[0.25,0.5,0.5],[0.75,0.5,0.5]]\n"
        );
    }

    #[test]
    fn rejects_duplicate_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path().join("r.tsv"), dir.path().join("d.txt")).unwrap();
        recorder.push(outcome(0, true, 0.0), sequence(&[])).unwrap();
        assert!(matches!(recorder.push(outcome(0, true, 0.0), sequence(&[])), Err(Error::Claimed(0))));
    }

    #[test]
    fn final_write_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("r.tsv");
        let recorder = Recorder::new(&results, dir.path().join("d.txt")).unwrap();
        std::fs::write(&results, "raced").unwrap();
        assert!(matches!(recorder.finish(), Err(Error::Collision(_))));
        assert_eq!(std::fs::read_to_string(&results).unwrap(), "raced");
    }

    #[test]
    fn checkpoints_each_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path().join("r.tsv"), dir.path().join("d.txt"))
            .unwrap()
            .checkpointed()
            .unwrap();
        recorder.push(outcome(7, false, 0.125), sequence(&[0.5])).unwrap();
        let saved = std::fs::read_to_string(dir.path().join("r.tsv.rounds").join("round-0007.json")).unwrap();
        let json = serde_json::from_str::<serde_json::Value>(&saved).unwrap();
        assert_eq!(json["outcome"]["round"], 7);
        assert_eq!(json["deviations"][0][0], 0.5);
    }

    #[test]
    fn resumes_from_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("r.tsv");
        let deviations = dir.path().join("d.txt");
        let mut crashed = Recorder::new(&results, &deviations).unwrap().checkpointed().unwrap();
        crashed.push(outcome(0, true, 0.0), sequence(&[])).unwrap();
        crashed.push(outcome(2, false, 0.75), sequence(&[0.25])).unwrap();
        drop(crashed);
        let mut resumed = Recorder::new(&results, &deviations).unwrap().checkpointed().unwrap();
        assert_eq!(resumed.len(), 2);
        assert!(resumed.contains(0) && resumed.contains(2) && !resumed.contains(1));
        assert!(matches!(resumed.push(outcome(2, false, 0.75), sequence(&[])), Err(Error::Claimed(2))));
        resumed.push(outcome(1, true, 0.5), sequence(&[])).unwrap();
        resumed.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&results).unwrap(), "true\t0\t0\ntrue\t1\t0.5\nfalse\t2\t0.75\n");
        assert_eq!(std::fs::read_to_string(&deviations).unwrap(), "[]\n[]\n[[0.25,0.5,0.5]]\n");
    }
}
