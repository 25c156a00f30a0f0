//! Snake game environment.
//!
//! The engine owns the rules: movement on a fixed grid, food placement, the
//! energy budget, termination and reward. It knows nothing about policies or
//! training; see `snakevo-evaluator` for the observation contract built on top
//! of it.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
