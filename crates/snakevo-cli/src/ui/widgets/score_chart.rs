use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};
use snakevo_training::statistics::ScoreHistory;

use crate::ui::widgets::style;

/// Live line chart of the best score per generation and its running mean.
///
/// The chart owns its data; call [`update`](Self::update) once per generation.
#[derive(Debug, Default, Clone)]
pub struct ScoreChart {
    scores: Vec<(f64, f64)>,
    means: Vec<(f64, f64)>,
    max_score: f64,
}

impl ScoreChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the plotted series with the contents of `history`.
    #[expect(clippy::cast_precision_loss)]
    pub fn update(&mut self, history: &ScoreHistory) {
        self.scores.clear();
        self.scores.extend(
            history
                .scores()
                .iter()
                .enumerate()
                .map(|(i, &score)| (i as f64, score as f64)),
        );
        self.means.clear();
        self.means.extend(
            history
                .means()
                .iter()
                .enumerate()
                .map(|(i, &mean)| (i as f64, mean)),
        );
        self.max_score = history.max_score() as f64;
    }

    fn title(&self) -> String {
        let score = self.scores.last().map_or(0.0, |&(_, s)| s);
        let mean = self.means.last().map_or(0.0, |&(_, m)| m);
        format!("Training - Current: {score} | Mean: {mean:.2}")
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.scores.last().map_or(0.0, |&(x, _)| x).max(1.0)]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [0.0, (self.max_score * 1.1).max(1.0)]
    }
}

impl Widget for &ScoreChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let datasets = vec![
            Dataset::default()
                .name("Score")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style::SCORE_SERIES)
                .data(&self.scores),
            Dataset::default()
                .name("Mean")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style::MEAN_SERIES)
                .data(&self.means),
        ];

        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();
        let x_axis = Axis::default()
            .title("Generation")
            .style(style::HELP)
            .bounds([x_min, x_max])
            .labels([format!("{x_min:.0}"), format!("{x_max:.0}")]);
        let y_axis = Axis::default()
            .title("Score")
            .style(style::HELP)
            .bounds([y_min, y_max])
            .labels([format!("{y_min:.0}"), format!("{y_max:.0}")]);

        Chart::new(datasets)
            .block(Block::bordered().title(Line::from(self.title()).centered()))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart() {
        let chart = ScoreChart::new();
        assert!(chart.scores.is_empty());
        assert_eq!(chart.x_bounds(), [0.0, 1.0]);
        assert_eq!(chart.y_bounds(), [0.0, 1.0]);
        assert_eq!(chart.title(), "Training - Current: 0 | Mean: 0.00");
    }

    #[test]
    fn test_update_follows_history() {
        let mut history = ScoreHistory::new();
        let mut chart = ScoreChart::new();
        for score in [1, 3, 5] {
            history.push(score);
            chart.update(&history);
        }
        assert_eq!(chart.scores, [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
        assert_eq!(chart.means, [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(chart.x_bounds(), [0.0, 2.0]);
        assert_eq!(chart.title(), "Training - Current: 5 | Mean: 3.00");
    }

    #[test]
    fn test_render_does_not_panic_on_small_area() {
        let mut history = ScoreHistory::new();
        history.push(2);
        let mut chart = ScoreChart::new();
        chart.update(&history);
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
    }
}
