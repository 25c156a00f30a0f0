use crate::core::direction::Direction;

/// Point on the playing field, in pixel units.
///
/// Snake segments and food are always aligned to multiples of the grid's block
/// size, so moving one cell means adding `block_size` to a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighboring position `step` pixels away in `direction`.
    #[must_use]
    pub const fn moved(self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx * step, self.y + dy * step)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        #[expect(clippy::cast_possible_truncation)]
        let distance = dx.hypot(dy) as f32;
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_uses_step_size() {
        let p = Position::new(320, 240);
        assert_eq!(p.moved(Direction::Right, 20), Position::new(340, 240));
        assert_eq!(p.moved(Direction::Down, 20), Position::new(320, 260));
        assert_eq!(p.moved(Direction::Left, 20), Position::new(300, 240));
        assert_eq!(p.moved(Direction::Up, 20), Position::new(320, 220));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(60, 80);
        assert!((a.distance(b) - 100.0).abs() < f32::EPSILON);
        assert!(a.distance(a).abs() < f32::EPSILON);
    }
}
