//! Grid primitives shared by the engine and its consumers.
//!
//! - [`Position`] - pixel-aligned location of a segment or food item
//! - [`Direction`] - absolute travel direction, a closed clockwise cycle
//! - [`Action`] - relative move a controller picks each tick

pub use self::{direction::*, position::*};

mod direction;
mod position;
