use snakevo_engine::{GameConfig, GameSeed, SnakeGame, Termination};

use crate::{observation::Observation, policy::PolicyNetwork};

/// Receives every frame of an episode.
///
/// This is the only coupling between evaluation and rendering; the runner
/// never draws anything itself.
pub trait FrameObserver {
    fn observe(&mut self, game: &SnakeGame);
}

/// Observer that ignores every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {
    fn observe(&mut self, _game: &SnakeGame) {}
}

impl<T> FrameObserver for &mut T
where
    T: FrameObserver + ?Sized,
{
    fn observe(&mut self, game: &SnakeGame) {
        (**self).observe(game);
    }
}

/// Result of one complete episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    /// Sum of all step rewards.
    pub fitness: f32,
    /// Food eaten before termination.
    pub score: usize,
    /// Number of steps taken, including the terminal one.
    pub steps: usize,
    pub termination: Termination,
}

/// Plays a policy through one full episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    config: GameConfig,
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl EpisodeRunner {
    #[must_use]
    pub const fn new(config: GameConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Runs `network` from a fresh game until the episode terminates.
    ///
    /// The observer sees the state after every step, terminal step included.
    /// Every episode is finite: energy drops by one per step and only food
    /// restores it, while the timeout bounds the frame count by the body
    /// length.
    pub fn run<O>(&self, network: &PolicyNetwork, seed: GameSeed, mut observer: O) -> EpisodeOutcome
    where
        O: FrameObserver,
    {
        let mut game = SnakeGame::with_seed(self.config, seed);
        let mut fitness = 0.0;
        loop {
            let observation = Observation::encode(&game);
            let action = network.select_action(&observation);
            let outcome = game.step(action);
            fitness += outcome.reward;
            observer.observe(&game);
            if let Some(termination) = outcome.termination {
                return EpisodeOutcome {
                    fitness,
                    score: outcome.score,
                    steps: game.frame(),
                    termination,
                };
            }
        }
    }
}
