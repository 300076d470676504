//! Sequential estimate of how often the oracle finds a deviation.

mod confidence;
mod confirmer;
mod stopping;

pub use confidence::*;
pub use confirmer::*;
pub use stopping::*;
