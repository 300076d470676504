//! Write-once run outputs.

mod outcome;
mod recorder;

pub use outcome::*;
pub use recorder::*;
