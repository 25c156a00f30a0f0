use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Gauge, Widget},
};
use snakevo_engine::{MAX_ENERGY, SnakeGame};

use crate::ui::widgets::{color, style};

/// Color of the energy readout: green when full enough, yellow when getting
/// low, red when nearly starved.
pub fn energy_color(energy: u32) -> Color {
    match energy {
        50.. => color::GREEN,
        20.. => color::YELLOW,
        _ => color::RED,
    }
}

/// Shows score, best score, all-time record and an energy gauge.
#[derive(Debug)]
pub struct DashboardDisplay<'a> {
    game: &'a SnakeGame,
    record: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> DashboardDisplay<'a> {
    pub fn new(game: &'a SnakeGame, record: usize) -> Self {
        Self {
            game,
            record,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        4 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for DashboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &DashboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let [scores_area, energy_label_area, gauge_area, frame_area] =
            Layout::vertical([Constraint::Length(1); 4]).areas(area);

        let [score_area, best_area, record_area] =
            Layout::horizontal([Constraint::Fill(1); 3]).areas(scores_area);
        Line::styled(format!("Score: {}", self.game.score()), style::DEFAULT)
            .left_aligned()
            .render(score_area, buf);
        Line::styled(format!("Best: {}", self.game.best_score()), style::BEST)
            .centered()
            .render(best_area, buf);
        Line::styled(format!("Record: {}", self.record), style::DEFAULT)
            .right_aligned()
            .render(record_area, buf);

        let energy = self.game.energy();
        let energy_style = Style::new().fg(energy_color(energy));
        Line::styled(format!("Energy: {energy}/{MAX_ENERGY}"), energy_style)
            .left_aligned()
            .render(energy_label_area, buf);
        Gauge::default()
            .gauge_style(energy_style.bg(color::BLACK))
            .ratio(f64::from(energy) / f64::from(MAX_ENERGY))
            .label("")
            .render(gauge_area, buf);

        Line::styled(format!("Frame: {}", self.game.frame()), style::HELP)
            .right_aligned()
            .render(frame_area, buf);
    }
}
