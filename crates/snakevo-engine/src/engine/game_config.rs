use crate::core::Position;

/// Errors returned when a [`GameConfig`] describes an unusable grid.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameConfigError {
    #[display("block size must be positive, got {_0}")]
    InvalidBlockSize(#[error(not(source))] i32),
    #[display("grid of {columns}x{rows} cells cannot hold the initial snake")]
    GridTooSmall { columns: i32, rows: i32 },
}

/// Dimensions of the playing field.
///
/// `width` and `height` are in pixels; the field is split into square cells of
/// `block_size` pixels. Partial cells at the right or bottom edge are not
/// playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    width: i32,
    height: i32,
    block_size: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl GameConfig {
    /// 640×480 field of 20 pixel cells (32×24 cells).
    pub const DEFAULT: Self = Self {
        width: 640,
        height: 480,
        block_size: 20,
    };

    /// Creates a validated configuration.
    ///
    /// The head starts in column `columns / 2` with two body segments to its
    /// left, so the grid must be at least 4 cells wide.
    pub fn new(width: i32, height: i32, block_size: i32) -> Result<Self, GameConfigError> {
        if block_size <= 0 {
            return Err(GameConfigError::InvalidBlockSize(block_size));
        }
        let config = Self {
            width,
            height,
            block_size,
        };
        let (columns, rows) = (config.columns(), config.rows());
        if columns < 4 || rows < 1 {
            return Err(GameConfigError::GridTooSmall { columns, rows });
        }
        Ok(config)
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn block_size(&self) -> i32 {
        self.block_size
    }

    /// Number of playable cells per row.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of playable cells per column.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Number of playable cells on the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells =
            u64::from(self.columns().unsigned_abs()) * u64::from(self.rows().unsigned_abs());
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Position of the cell at column `column`, row `row`.
    #[must_use]
    pub const fn cell(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.block_size, row * self.block_size)
    }

    /// Cell the head starts on: the middle cell of the grid.
    #[must_use]
    pub const fn center(&self) -> Position {
        self.cell(self.columns() / 2, self.rows() / 2)
    }

    /// Returns whether `pos` lies on a playable cell.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x <= self.width - self.block_size
            && pos.y <= self.height - self.block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let config = GameConfig::default();
        assert_eq!(config.columns(), 32);
        assert_eq!(config.rows(), 24);
        assert_eq!(config.center(), Position::new(320, 240));
    }

    #[test]
    fn test_contains_bounds() {
        let config = GameConfig::default();
        assert!(config.contains(Position::new(0, 0)));
        assert!(config.contains(Position::new(620, 460)));
        assert!(!config.contains(Position::new(640, 0)));
        assert!(!config.contains(Position::new(0, 480)));
        assert!(!config.contains(Position::new(-20, 0)));
        assert!(!config.contains(Position::new(0, -20)));
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert_eq!(
            GameConfig::new(640, 480, 0),
            Err(GameConfigError::InvalidBlockSize(0))
        );
        assert_eq!(
            GameConfig::new(40, 480, 20),
            Err(GameConfigError::GridTooSmall {
                columns: 2,
                rows: 24
            })
        );
        assert_eq!(
            GameConfig::new(60, 20, 20),
            Err(GameConfigError::GridTooSmall {
                columns: 3,
                rows: 1
            })
        );
        assert!(GameConfig::new(80, 20, 20).is_ok());
    }

    #[test]
    fn test_cell_count_does_not_overflow() {
        assert_eq!(GameConfig::default().cell_count(), 32 * 24);
        let huge = GameConfig::new(2_000_000_000, 2_000_000_000, 1).unwrap();
        assert_eq!(
            huge.cell_count(),
            usize::try_from(4_000_000_000_000_000_000_u64).unwrap_or(usize::MAX)
        );
    }
}
