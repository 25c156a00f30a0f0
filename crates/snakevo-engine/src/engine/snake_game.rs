use std::collections::VecDeque;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::core::{Action, Direction, Position};

use super::{game_config::GameConfig, game_seed::GameSeed};

/// Energy the snake starts with and can never exceed.
pub const MAX_ENERGY: u32 = 200;
/// Energy consumed by every step.
pub const ENERGY_STEP_COST: u32 = 1;
/// Energy restored by eating, clamped to [`MAX_ENERGY`].
pub const ENERGY_FOOD_BONUS: u32 = 40;

/// Reward for eating a food item.
pub const FOOD_REWARD: f32 = 20.0;
/// Reward for hitting a wall, the body, or running out of frames.
pub const COLLISION_PENALTY: f32 = -10.0;
/// Reward for starving.
pub const ENERGY_DEPLETION_PENALTY: f32 = -50.0;
/// Shaping term added when the head gets closer to the food (subtracted otherwise).
pub const APPROACH_REWARD: f32 = 0.5;
/// Small cost of every surviving step.
pub const EXISTENCE_PENALTY: f32 = 0.01;
/// An episode times out once the frame counter exceeds this many frames per body segment.
pub const FRAMES_PER_SEGMENT: usize = 100;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Termination {
    /// Energy reached zero. Checked before anything else.
    #[display("energy depleted")]
    EnergyDepleted,
    /// Head left the grid or ran into the body.
    #[display("collision")]
    Collision,
    /// The frame counter exceeded [`FRAMES_PER_SEGMENT`] times the body length.
    #[display("timeout")]
    Timeout,
    /// The snake ate the last free cell's food and now covers the whole grid.
    #[display("board filled")]
    BoardFilled,
}

impl Termination {
    /// Reward reported on the terminal step.
    #[must_use]
    pub const fn reward(self) -> f32 {
        match self {
            Self::EnergyDepleted => ENERGY_DEPLETION_PENALTY,
            Self::Collision | Self::Timeout => COLLISION_PENALTY,
            Self::BoardFilled => FOOD_REWARD,
        }
    }
}

/// Result of a single [`SnakeGame::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub reward: f32,
    /// `Some` when this step ended the episode.
    pub termination: Option<Termination>,
    /// Food eaten so far in the episode.
    pub score: usize,
}

impl StepOutcome {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.termination.is_some()
    }
}

/// Snake game environment.
///
/// Holds the full state of one episode and advances it one tick per
/// [`step`](Self::step). Food placement draws from a seeded [`Pcg32`], so the
/// game is deterministic for a given seed and action sequence.
///
/// # Example
///
/// ```
/// use snakevo_engine::{Action, Direction, GameConfig, GameSeed, Position, SnakeGame};
///
/// let mut game = SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(7));
/// assert_eq!(game.head(), Position::new(320, 240));
///
/// let outcome = game.step(Action::TurnRight);
/// assert_eq!(game.direction(), Direction::Down);
/// assert_eq!(game.head(), Position::new(320, 260));
/// assert!(!outcome.is_terminal());
/// ```
#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: GameConfig,
    rng: Pcg32,
    body: VecDeque<Position>,
    direction: Direction,
    food: Position,
    score: usize,
    best_score: usize,
    energy: u32,
    frame: usize,
    prev_distance: f32,
    termination: Option<Termination>,
}

impl SnakeGame {
    /// Creates a game with a random seed.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic food placement.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: GameSeed) -> Self {
        let mut game = Self {
            config,
            rng: Pcg32::from_seed(seed.0),
            body: VecDeque::new(),
            direction: Direction::Right,
            food: Position::default(),
            score: 0,
            best_score: 0,
            energy: MAX_ENERGY,
            frame: 0,
            prev_distance: 0.0,
            termination: None,
        };
        game.reset();
        game
    }

    /// Starts a fresh episode.
    ///
    /// The best score is kept; everything else goes back to its initial value.
    pub fn reset(&mut self) {
        let block = self.config.block_size();
        let head = self.config.center();

        self.direction = Direction::Right;
        self.body.clear();
        self.body.extend([
            head,
            Position::new(head.x - block, head.y),
            Position::new(head.x - 2 * block, head.y),
        ]);
        self.score = 0;
        self.energy = MAX_ENERGY;
        self.frame = 0;
        self.termination = None;
        // a valid grid has at least 4 cells, so there is room for food
        self.place_food();
        self.prev_distance = head.distance(self.food);
    }

    /// Places food on a uniformly random cell not covered by the body.
    ///
    /// Returns `false`, leaving the food untouched, when the body covers the
    /// whole grid.
    fn place_food(&mut self) -> bool {
        if self.body.len() >= self.config.cell_count() {
            return false;
        }
        loop {
            let column = self.rng.random_range(0..self.config.columns());
            let row = self.rng.random_range(0..self.config.rows());
            let food = self.config.cell(column, row);
            if !self.body.contains(&food) {
                self.food = food;
                return true;
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Body segments, head first.
    #[must_use]
    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    /// Food eaten in the current episode.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Highest score reached by this game instance across resets.
    #[must_use]
    pub fn best_score(&self) -> usize {
        self.best_score
    }

    #[must_use]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    /// Steps taken in the current episode.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Distance from the head to the food as of the last step.
    #[must_use]
    pub fn prev_distance(&self) -> f32 {
        self.prev_distance
    }

    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    /// Returns whether the head is outside the grid or on its own body.
    #[must_use]
    pub fn is_collision(&self) -> bool {
        self.is_collision_at(self.head())
    }

    /// Returns whether `point` is outside the grid or on a body segment other than the head.
    #[must_use]
    pub fn is_collision_at(&self, point: Position) -> bool {
        !self.config.contains(point) || self.body.iter().skip(1).any(|&p| p == point)
    }

    /// Advances the game by one tick.
    ///
    /// Termination is decided in priority order: energy depletion first, then
    /// collision or timeout. Terminal steps return immediately with the
    /// matching penalty. Otherwise the step rewards food, shapes the reward by
    /// whether the head approached the food, and subtracts the existence
    /// penalty.
    ///
    /// Stepping a game that already ended changes nothing and reports the same
    /// termination with zero reward.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        if let Some(termination) = self.termination {
            return StepOutcome {
                reward: 0.0,
                termination: Some(termination),
                score: self.score,
            };
        }

        self.frame += 1;
        self.direction = action.apply(self.direction);
        let head = self.head().moved(self.direction, self.config.block_size());
        self.body.push_front(head);
        self.energy = self.energy.saturating_sub(ENERGY_STEP_COST);

        let termination = if self.energy == 0 {
            Some(Termination::EnergyDepleted)
        } else if self.is_collision() {
            Some(Termination::Collision)
        } else if self.frame > FRAMES_PER_SEGMENT * self.body.len() {
            Some(Termination::Timeout)
        } else {
            None
        };
        if let Some(termination) = termination {
            self.termination = Some(termination);
            return StepOutcome {
                reward: termination.reward(),
                termination: Some(termination),
                score: self.score,
            };
        }

        let mut reward = 0.0;
        if head == self.food {
            self.score += 1;
            self.best_score = self.best_score.max(self.score);
            reward = FOOD_REWARD;
            self.energy = MAX_ENERGY.min(self.energy + ENERGY_FOOD_BONUS);
            if !self.place_food() {
                let termination = Termination::BoardFilled;
                self.termination = Some(termination);
                return StepOutcome {
                    reward: termination.reward(),
                    termination: Some(termination),
                    score: self.score,
                };
            }
        } else {
            self.body.pop_back();
        }

        let distance = head.distance(self.food);
        if distance < self.prev_distance {
            reward += APPROACH_REWARD;
        } else {
            reward -= APPROACH_REWARD;
        }
        self.prev_distance = distance;
        reward -= EXISTENCE_PENALTY;

        StepOutcome {
            reward,
            termination: None,
            score: self.score,
        }
    }
}
