use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use snakevo_engine::{Position, SnakeGame};

use crate::ui::widgets::style;

/// What occupies one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Body,
    Head,
    Food,
}

impl Cell {
    /// Each grid cell is two terminal columns wide so it renders roughly square.
    const WIDTH: u16 = 2;

    fn style(self) -> Style {
        match self {
            Self::Empty => style::EMPTY,
            Self::Body => style::BODY,
            Self::Head => style::HEAD,
            Self::Food => style::FOOD,
        }
    }
}

/// Draws the grid with the snake and the food.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    game: &'a SnakeGame,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ArenaDisplay<'a> {
    pub fn new(game: &'a SnakeGame) -> Self {
        Self { game, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        grid_len(self.game.config().columns()) * Cell::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        grid_len(self.game.config().rows()) + super::block_vertical_margin(self.block.as_ref())
    }

    fn cells(&self) -> Vec<Vec<Cell>> {
        let config = self.game.config();
        let columns = usize::from(grid_len(config.columns()));
        let rows = usize::from(grid_len(config.rows()));
        let mut cells = vec![vec![Cell::Empty; columns]; rows];

        let mut put = |pos: Position, cell: Cell| {
            if !config.contains(pos) {
                return;
            }
            let column = usize::try_from(pos.x / config.block_size()).unwrap_or(usize::MAX);
            let row = usize::try_from(pos.y / config.block_size()).unwrap_or(usize::MAX);
            if let Some(slot) = cells.get_mut(row).and_then(|r| r.get_mut(column)) {
                *slot = cell;
            }
        };

        put(self.game.food(), Cell::Food);
        for segment in self.game.body().iter().skip(1) {
            put(*segment, Cell::Body);
        }
        put(self.game.head(), Cell::Head);
        cells
    }
}

fn grid_len(cells: i32) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let cells = self.cells();
        let columns = cells.first().map_or(0, Vec::len);
        let [area] = Layout::horizontal([Constraint::Length(
            u16::try_from(columns).unwrap_or(u16::MAX) * Cell::WIDTH,
        )])
        .flex(Flex::Center)
        .areas(area);

        for (dy, row) in (0..area.height).zip(&cells) {
            for (dx, cell) in (0..area.width).step_by(usize::from(Cell::WIDTH)).zip(row) {
                for offset in 0..Cell::WIDTH {
                    if let Some(buf_cell) = buf.cell_mut((area.x + dx + offset, area.y + dy)) {
                        buf_cell.set_symbol(" ").set_style(cell.style());
                    }
                }
            }
        }
    }
}
