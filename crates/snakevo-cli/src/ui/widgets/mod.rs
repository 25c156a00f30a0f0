use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{arena_display::*, dashboard_display::*, score_chart::*};

mod arena_display;
mod dashboard_display;
mod score_chart;

mod color {
    use ratatui::style::Color;

    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(200, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const LIGHT_BLUE: Color = Color::Rgb(0, 100, 255);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HELP: Style = Style::new().fg(color::GRAY);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const BODY: Style = bg_only(color::BLUE);
    pub const HEAD: Style = bg_only(color::LIGHT_BLUE);
    pub const FOOD: Style = bg_only(color::RED);
    pub const BEST: Style = Style::new().fg(color::YELLOW);
    pub const SCORE_SERIES: Style = Style::new().fg(color::CYAN);
    pub const MEAN_SERIES: Style = Style::new().fg(color::YELLOW);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
