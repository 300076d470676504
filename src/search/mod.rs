//! Greedy first-improvement deviation search for one test round.

mod phase;
mod report;
mod round;
mod sequence;
mod step;

pub use phase::*;
pub use report::*;
pub use round::*;
pub use sequence::*;
pub use step::*;
