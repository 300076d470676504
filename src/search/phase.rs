/// Where a round's search stands.
///
/// `Searching(0)` → `Searching(s + 1)` on an accepted deviation, until either
/// a step exhausts its trials (`Confirmed(s)`) or the step limit is reached
/// while deviations keep being found (`FoundDeviation(s)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Searching(usize),
    FoundDeviation(usize),
    Confirmed(usize),
}

impl Phase {
    pub fn step(&self) -> usize {
        match *self {
            Self::Searching(s) | Self::FoundDeviation(s) | Self::Confirmed(s) => s,
        }
    }
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Searching(_))
    }
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Searching(s) => write!(f, "searching({})", s),
            Self::FoundDeviation(s) => write!(f, "found_deviation({})", s),
            Self::Confirmed(s) => write!(f, "confirmed({})", s),
        }
    }
}
