/// Absolute travel direction of the snake.
///
/// Variants are declared in clockwise order. Turning right advances one step
/// along that cycle, turning left goes one step back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All directions in clockwise order, starting from [`Direction::Right`].
    pub const CLOCKWISE: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// Returns the direction one clockwise step after `self`.
    ///
    /// ```
    /// use snakevo_engine::Direction;
    ///
    /// assert_eq!(Direction::Right.turned_right(), Direction::Down);
    /// assert_eq!(Direction::Up.turned_right(), Direction::Right);
    /// ```
    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
            Self::Up => Self::Right,
        }
    }

    /// Returns the direction one counter-clockwise step before `self`.
    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Self::Right => Self::Up,
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
        }
    }

    /// Unit offset in grid cells.
    ///
    /// The y axis grows downwards, matching screen coordinates.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
        }
    }
}

/// Relative move chosen by a controller.
///
/// Actions are interpreted against the current [`Direction`], so the snake can
/// never reverse onto its own neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    /// Number of distinct actions (size of a policy's output layer).
    pub const LEN: usize = 3;

    /// All actions, indexed the same way as a policy's output scores.
    pub const ALL: [Self; Self::LEN] = [Self::Straight, Self::TurnRight, Self::TurnLeft];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Straight => 0,
            Self::TurnRight => 1,
            Self::TurnLeft => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Straight),
            1 => Some(Self::TurnRight),
            2 => Some(Self::TurnLeft),
            _ => None,
        }
    }

    /// Returns the direction obtained by applying this action to `direction`.
    #[must_use]
    pub const fn apply(self, direction: Direction) -> Direction {
        match self {
            Self::Straight => direction,
            Self::TurnRight => direction.turned_right(),
            Self::TurnLeft => direction.turned_left(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_follow_clockwise_cycle() {
        for (i, dir) in Direction::CLOCKWISE.into_iter().enumerate() {
            assert_eq!(dir.turned_right(), Direction::CLOCKWISE[(i + 1) % 4]);
            assert_eq!(dir.turned_left(), Direction::CLOCKWISE[(i + 3) % 4]);
            assert_eq!(dir.turned_right().turned_left(), dir);
        }
    }

    #[test]
    fn test_four_right_turns_return_to_start() {
        let mut dir = Direction::Left;
        for _ in 0..4 {
            dir = Action::TurnRight.apply(dir);
        }
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_action_index_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), Some(action));
        }
        assert_eq!(Action::from_index(Action::LEN), None);
    }

    #[test]
    fn test_delta_is_unit_step() {
        for dir in Direction::CLOCKWISE {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Direction::Down.delta(), (0, 1));
    }
}
