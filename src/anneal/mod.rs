//! Reference best-response oracle.

mod annealer;

pub use annealer::*;
