//! Step animation timing for flip transitions.

mod easing;
mod runner;

pub use easing::Easing;
pub use runner::{FlipAnimation, FlipFrame};
