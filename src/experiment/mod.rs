//! Run configuration and the round scheduler.

mod config;
mod experiment;
mod scenario;

pub use config::*;
pub use experiment::*;
pub use scenario::*;
