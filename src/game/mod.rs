//! Game-side value types and the reference payoff surface.

mod params;
mod strategy;
mod surface;

pub use params::*;
pub use strategy::*;
pub use surface::*;
