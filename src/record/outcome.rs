use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Result of one test round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// No deviation was found before a step's trial budget ran out.
    pub confirmed: bool,
    pub round: usize,
    /// Estimated probability that one oracle trial finds a deviation.
    pub probability: Probability,
}

impl Outcome {
    /// Tab-separated `confirmed  round  probability` row.
    pub fn row(&self) -> String {
        format!("{}\t{}\t{}", self.confirmed, self.round, self.probability)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {:.4})", self.confirmed, self.round, self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row() {
        let outcome = Outcome {
            confirmed: true,
            round: 3,
            probability: 0.25,
        };
        assert_eq!(outcome.row(), "true\t3\t0.25");
    }
}
