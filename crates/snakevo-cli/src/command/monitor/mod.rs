//! Terminal view of a running agent, shared by `train` and `watch`.
//!
//! The work runs on a background thread that streams [`MonitorEvent`]s to
//! [`MonitorApp`] over a channel. Frames of the rendered episode go through
//! [`FrameSender`], which paces them to [`FRAME_RATE`].

use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use snakevo_engine::SnakeGame;
use snakevo_evaluator::episode::FrameObserver;
use snakevo_training::statistics::ScoreHistory;

pub(crate) use self::app::MonitorApp;

mod app;

/// Frames per second of the rendered episode.
pub(crate) const FRAME_RATE: f64 = 20.0;

#[derive(Debug)]
pub(crate) enum MonitorEvent {
    Frame(SnakeGame),
    /// One line of progress, with the all-time record and, during training,
    /// the score history to plot.
    Summary {
        line: String,
        record: usize,
        history: Option<ScoreHistory>,
    },
    Log(String),
}

/// Frame observer that forwards every frame to the terminal view.
///
/// Sending blocks long enough to keep frames [`FRAME_RATE`] apart. Frames are
/// dropped silently once the view has gone away.
#[derive(Debug)]
pub(crate) struct FrameSender {
    tx: mpsc::Sender<MonitorEvent>,
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameSender {
    pub(crate) fn new(tx: mpsc::Sender<MonitorEvent>) -> Self {
        Self {
            tx,
            interval: Duration::from_secs_f64(1.0 / FRAME_RATE),
            last_frame: None,
        }
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

impl FrameObserver for FrameSender {
    fn observe(&mut self, game: &SnakeGame) {
        self.pace();
        let _ = self.tx.send(MonitorEvent::Frame(game.clone()));
    }
}

#[cfg(test)]
mod tests {
    use snakevo_engine::{Action, GameConfig, GameSeed};

    use super::*;

    #[test]
    fn test_frame_sender_forwards_frames() {
        let (tx, rx) = mpsc::channel();
        let mut sender = FrameSender::new(tx);
        let mut game = SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(0));

        let start = Instant::now();
        for _ in 0..3 {
            game.step(Action::Straight);
            sender.observe(&game);
        }
        assert!(start.elapsed() >= Duration::from_millis(100));

        let frames: Vec<_> = rx
            .try_iter()
            .map(|event| match event {
                MonitorEvent::Frame(game) => game.frame(),
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(frames, [1, 2, 3]);
    }

    #[test]
    fn test_frame_sender_ignores_closed_view() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sender = FrameSender::new(tx);
        let game = SnakeGame::with_seed(GameConfig::default(), GameSeed::from_u64(0));
        sender.observe(&game);
    }
}
