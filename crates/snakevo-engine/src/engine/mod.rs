//! Game rules and episode state.
//!
//! - [`GameConfig`] - grid dimensions in pixels and block size
//! - [`GameSeed`] - seed for deterministic food placement
//! - [`SnakeGame`] - one episode: body, direction, food, energy, score
//! - [`StepOutcome`] / [`Termination`] - what a single tick produced
//!
//! # Game Flow
//!
//! 1. Create a [`SnakeGame`] (this calls [`SnakeGame::reset`])
//! 2. Pick an [`Action`](crate::Action) relative to the current direction
//! 3. Call [`SnakeGame::step`] and accumulate the reward
//! 4. Repeat until the outcome is terminal
//!
//! Termination is part of the normal flow: starving, crashing, running out
//! of frames and filling the grid each come back as a [`Termination`] with
//! its reward, never as an error.
//!
//! # Reward
//!
//! | event                 | reward                          |
//! |-----------------------|---------------------------------|
//! | energy depleted       | [`ENERGY_DEPLETION_PENALTY`]    |
//! | collision / timeout   | [`COLLISION_PENALTY`]           |
//! | food eaten            | [`FOOD_REWARD`] + shaping       |
//! | board filled          | [`FOOD_REWARD`], episode ends   |
//! | any other step        | shaping                         |
//!
//! Shaping is `±`[`APPROACH_REWARD`] depending on whether the head got closer
//! to the food, minus [`EXISTENCE_PENALTY`].

pub use self::{game_config::*, game_seed::*, snake_game::*};

mod game_config;
mod game_seed;
mod snake_game;
