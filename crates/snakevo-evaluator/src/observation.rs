//! State encoding: the observation vector a policy sees each tick.
//!
//! The layout is fixed; a trained genome only makes sense against the exact
//! index order below.
//!
//! | index | meaning                                      |
//! |-------|----------------------------------------------|
//! | 0     | danger if going straight                     |
//! | 1     | danger if turning right                      |
//! | 2     | danger if turning left                       |
//! | 3..7  | direction one-hot: left, right, up, down     |
//! | 7     | food is left of the head                     |
//! | 8     | food is right of the head                    |
//! | 9     | food is above the head                       |
//! | 10    | food is below the head                       |
//! | 11    | energy / 100                                 |
//!
//! Flags are `0.0` or `1.0`.

use snakevo_engine::{Direction, Position, SnakeGame};

/// Absolute neighbors of the head checked for the straight, right and left
/// danger flags, keyed by the current direction.
const fn danger_directions(direction: Direction) -> [Direction; 3] {
    match direction {
        Direction::Right => [Direction::Right, Direction::Down, Direction::Up],
        Direction::Left => [Direction::Left, Direction::Up, Direction::Down],
        Direction::Up => [Direction::Up, Direction::Right, Direction::Left],
        Direction::Down => [Direction::Down, Direction::Left, Direction::Right],
    }
}

/// Fixed-size input vector for a policy network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; Observation::LEN]);

impl Observation {
    pub const LEN: usize = 12;

    /// Energy is divided by this value before being fed to the network.
    pub const ENERGY_SCALE: f32 = 100.0;

    /// Encodes the current state of `game`.
    #[must_use]
    pub fn encode(game: &SnakeGame) -> Self {
        let head = game.head();
        let food = game.food();
        let direction = game.direction();
        let block = game.config().block_size();

        let danger = danger_directions(direction)
            .map(|dir| game.is_collision_at(head.moved(dir, block)));
        let food_flags = food_offsets(head, food);

        #[expect(clippy::cast_precision_loss)]
        let energy = game.energy() as f32 / Self::ENERGY_SCALE;

        Self([
            flag(danger[0]),
            flag(danger[1]),
            flag(danger[2]),
            flag(direction.is_left()),
            flag(direction.is_right()),
            flag(direction.is_up()),
            flag(direction.is_down()),
            flag(food_flags[0]),
            flag(food_flags[1]),
            flag(food_flags[2]),
            flag(food_flags[3]),
            energy,
        ])
    }

    #[must_use]
    pub const fn from_array(values: [f32; Self::LEN]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f32; Self::LEN] {
        &self.0
    }

    /// Danger flags for straight, right and left, in that order.
    #[must_use]
    pub fn danger(&self) -> [bool; 3] {
        [self.0[0] > 0.5, self.0[1] > 0.5, self.0[2] > 0.5]
    }
}

fn food_offsets(head: Position, food: Position) -> [bool; 4] {
    [
        food.x < head.x,
        food.x > head.x,
        food.y < head.y,
        food.y > head.y,
    ]
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use snakevo_engine::{Action, GameConfig, GameSeed};

    use super::*;

    /// Game whose first food item sits below every cell the tests walk over.
    fn new_game() -> SnakeGame {
        (0..)
            .map(|seed| SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(seed)))
            .find(|game| game.food().y >= 300)
            .unwrap()
    }

    #[test]
    fn test_danger_table_matches_relative_turns() {
        for dir in Direction::CLOCKWISE {
            assert_eq!(
                danger_directions(dir),
                [
                    Action::Straight.apply(dir),
                    Action::TurnRight.apply(dir),
                    Action::TurnLeft.apply(dir),
                ]
            );
        }
    }

    #[test]
    fn test_initial_observation() {
        let game = new_game();
        let obs = Observation::encode(&game);
        let values = obs.as_array();

        assert_eq!(obs.danger(), [false, false, false]);
        assert_eq!(&values[3..7], &[0.0, 1.0, 0.0, 0.0]);
        assert!((values[11] - 2.0).abs() < f32::EPSILON);

        let head = game.head();
        let food = game.food();
        assert_eq!(values[7], flag(food.x < head.x));
        assert_eq!(values[8], flag(food.x > head.x));
        assert_eq!(values[9], flag(food.y < head.y));
        assert_eq!(values[10], flag(food.y > head.y));
    }

    #[test]
    fn test_wall_ahead_is_danger_straight() {
        let mut game = new_game();
        // run until the head sits on the right-most column
        while game.head().x < game.config().width() - game.config().block_size() {
            game.step(Action::Straight);
        }
        assert!(!game.is_terminated());
        let obs = Observation::encode(&game);
        assert_eq!(obs.danger(), [true, false, false]);
    }

    #[test]
    fn test_direction_flags_after_turns() {
        let mut game = new_game();
        game.step(Action::TurnRight);
        let obs = Observation::encode(&game);
        assert_eq!(&obs.as_array()[3..7], &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(obs.danger(), [false, false, false]);

        game.step(Action::TurnRight);
        let obs = Observation::encode(&game);
        assert_eq!(&obs.as_array()[3..7], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(obs.danger(), [false, false, false]);
    }

    #[test]
    fn test_wall_on_the_left_of_travel() {
        let mut game = new_game();
        game.step(Action::TurnLeft);
        while game.head().y > 0 {
            game.step(Action::Straight);
        }
        let obs = Observation::encode(&game);
        assert_eq!(&obs.as_array()[3..7], &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(obs.danger(), [true, false, false]);

        // heading right along the top row: the wall is on the left of travel
        game.step(Action::TurnRight);
        assert_eq!(game.head(), Position::new(340, 0));
        let obs = Observation::encode(&game);
        assert_eq!(obs.danger(), [false, false, true]);
        assert_eq!(obs.as_array()[10], 1.0);
    }
}
