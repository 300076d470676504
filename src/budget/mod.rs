//! False-negative budget: how many oracle trials each testing step gets.

mod schedule;
mod tolerance;
mod trials;

pub use schedule::*;
pub use tolerance::*;
pub use trials::*;
