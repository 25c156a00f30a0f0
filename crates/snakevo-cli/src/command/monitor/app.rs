use std::{
    collections::VecDeque,
    sync::mpsc::{self, TryRecvError},
};

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::{Block, Paragraph},
};
use snakevo_engine::SnakeGame;

use crate::{
    command::monitor::{FRAME_RATE, MonitorEvent},
    tui::{App, RenderMode, Runtime},
    ui::widgets::{ArenaDisplay, DashboardDisplay, ScoreChart, style},
};

const LOG_CAPACITY: usize = 200;

#[derive(Debug)]
pub(crate) struct MonitorApp {
    title: String,
    rx: mpsc::Receiver<MonitorEvent>,
    game: SnakeGame,
    record: usize,
    chart: Option<ScoreChart>,
    log: VecDeque<String>,
    worker_done: bool,
    should_exit: bool,
}

impl MonitorApp {
    /// Creates the view. `game` is shown until the first frame arrives.
    pub(crate) fn new(
        title: impl Into<String>,
        game: SnakeGame,
        rx: mpsc::Receiver<MonitorEvent>,
    ) -> Self {
        Self {
            title: title.into(),
            rx,
            game,
            record: 0,
            chart: None,
            log: VecDeque::new(),
            worker_done: false,
            should_exit: false,
        }
    }

    /// Shows a live score chart next to the arena.
    pub(crate) fn with_chart(self) -> Self {
        Self {
            chart: Some(ScoreChart::new()),
            ..self
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    fn apply(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Frame(game) => self.game = game,
            MonitorEvent::Summary {
                line,
                record,
                history,
            } => {
                self.record = record;
                if let (Some(chart), Some(history)) = (&mut self.chart, &history) {
                    chart.update(history);
                }
                self.push_log(line);
            }
            MonitorEvent::Log(line) => self.push_log(line),
        }
    }

    /// Applies every pending event without blocking.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.worker_done {
                        self.worker_done = true;
                        self.push_log("Finished.".to_owned());
                    }
                    break;
                }
            }
        }
    }
}

impl App for MonitorApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FRAME_RATE));
        runtime.set_render_mode(RenderMode::interval_from_rate(FRAME_RATE));
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_press_event()
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            self.should_exit = true;
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let arena = ArenaDisplay::new(&self.game).block(
            Block::bordered()
                .title(Line::from(self.title.as_str()).centered())
                .style(style::DEFAULT),
        );
        let dashboard = DashboardDisplay::new(&self.game, self.record)
            .block(Block::bordered().style(style::DEFAULT));

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Length(arena.width()), Constraint::Fill(1)])
                .spacing(1)
                .areas(main_area);
        let [arena_area, dashboard_area] = Layout::vertical([
            Constraint::Length(arena.height()),
            Constraint::Length(dashboard.height()),
        ])
        .flex(Flex::Start)
        .areas(left_area);

        frame.render_widget(&arena, arena_area);
        frame.render_widget(&dashboard, dashboard_area);

        let log_area = if let Some(chart) = &self.chart {
            let [chart_area, log_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(12)]).areas(right_area);
            frame.render_widget(chart, chart_area);
            log_area
        } else {
            right_area
        };

        // newest lines at the bottom
        let visible = usize::from(log_area.height.saturating_sub(2));
        let lines = self
            .log
            .iter()
            .skip(self.log.len().saturating_sub(visible))
            .map(|line| Line::from(line.as_str()));
        frame.render_widget(
            Paragraph::new(Text::from_iter(lines))
                .block(Block::bordered().title("Log").style(style::DEFAULT)),
            log_area,
        );

        frame.render_widget(
            Text::from("Controls: q / Esc (Quit)")
                .style(style::HELP)
                .centered(),
            help_area,
        );
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.drain();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use snakevo_engine::{Action, GameConfig, GameSeed};
    use snakevo_training::statistics::ScoreHistory;

    use super::*;

    fn new_app() -> (MonitorApp, mpsc::Sender<MonitorEvent>) {
        let (tx, rx) = mpsc::channel();
        let game = SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(0));
        (MonitorApp::new("test", game, rx).with_chart(), tx)
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let (mut app, _tx) = new_app();
            let mut runtime = Runtime::new();
            app.handle_event(&mut runtime, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
            assert!(app.should_exit());
        }

        let (mut app, _tx) = new_app();
        let mut runtime = Runtime::new();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        app.handle_event(&mut runtime, Event::Key(key));
        assert!(!app.should_exit());
    }

    #[test]
    fn test_drain_applies_events() {
        let (mut app, tx) = new_app();
        let mut game = SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(1));
        game.step(Action::TurnLeft);
        tx.send(MonitorEvent::Frame(game)).unwrap();

        let mut history = ScoreHistory::new();
        history.push(4);
        tx.send(MonitorEvent::Summary {
            line: "Generation 1".to_owned(),
            record: 4,
            history: Some(history),
        })
        .unwrap();
        tx.send(MonitorEvent::Log("hello".to_owned())).unwrap();

        app.drain();
        assert_eq!(app.game.frame(), 1);
        assert_eq!(app.record, 4);
        assert_eq!(app.log, ["Generation 1", "hello"]);
        assert!(!app.worker_done);

        drop(tx);
        app.drain();
        assert!(app.worker_done);
        assert_eq!(app.log.back().map(String::as_str), Some("Finished."));
    }

    #[test]
    fn test_log_is_bounded() {
        let (mut app, _tx) = new_app();
        for i in 0..LOG_CAPACITY + 5 {
            app.push_log(i.to_string());
        }
        assert_eq!(app.log.len(), LOG_CAPACITY);
        assert_eq!(app.log.front().map(String::as_str), Some("5"));
    }
}
