use std::path::PathBuf;
use std::time::Duration;

/// Everything that can stop a run.
///
/// Configuration and collision errors are raised before any output is
/// committed. Collaborator errors propagate as fatal for the round, except
/// that [`Error::Unavailable`] is retried by [`crate::Retry`] and
/// [`Error::Timeout`] is absorbed by the greedy search as a failed trial.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("refusing to overwrite existing output {}", .0.display())]
    Collision(PathBuf),
    #[error("missing game data: {0}")]
    Missing(String),
    #[error("round {0} is already claimed")]
    Claimed(usize),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("best-response oracle failed: {0}")]
    Oracle(String),
    #[error("payoff evaluation failed: {0}")]
    Evaluator(String),
    #[error("collaborator call exceeded its time limit after {0:?}")]
    Timeout(Duration),
    #[error("degenerate confidence interval: {0}")]
    Statistics(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "server")]
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

impl Error {
    /// Failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
