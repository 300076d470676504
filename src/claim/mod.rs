//! Atomic per-round claims for parallel workers.

mod registry;

pub use registry::*;
