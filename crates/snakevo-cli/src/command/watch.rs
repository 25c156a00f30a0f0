use std::{path::PathBuf, sync::mpsc, thread};

use rand::Rng as _;
use snakevo_engine::SnakeGame;
use snakevo_evaluator::{
    episode::{EpisodeOutcome, EpisodeRunner},
    policy::PolicyNetwork,
};

use crate::{
    command::{
        DEFAULT_MODEL_PATH,
        game_arg::GameArg,
        monitor::{FrameSender, MonitorApp, MonitorEvent},
    },
    model::genome_model::GenomeModel,
    tui::Runtime,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WatchArg {
    /// Genome file to play
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    #[clap(flatten)]
    game: GameArg,
}

pub(crate) fn run(arg: &WatchArg) -> anyhow::Result<()> {
    let WatchArg { model, game } = arg;
    let config = game.to_config()?;
    let genome = GenomeModel::open(model)?;

    let (tx, rx) = mpsc::channel();
    let _ = tx.send(MonitorEvent::Log(format!(
        "Loaded {} from {} (generation {}, score {})",
        genome.name,
        model.display(),
        genome.generation,
        genome.score
    )));
    let mut app = MonitorApp::new("snakevo - watch", SnakeGame::new(config), rx);
    let runner = EpisodeRunner::new(config);
    thread::spawn(move || play_forever(&runner, &genome.network, &tx));
    Runtime::new().run(&mut app)?;
    Ok(())
}

/// Plays episodes back to back until the view closes.
fn play_forever(runner: &EpisodeRunner, network: &PolicyNetwork, tx: &mpsc::Sender<MonitorEvent>) {
    let mut rng = rand::rng();
    let mut best = 0;
    for episode in 1.. {
        let outcome = runner.run(network, rng.random(), FrameSender::new(tx.clone()));
        best = best.max(outcome.score);
        let summary = MonitorEvent::Summary {
            line: summary_line(episode, &outcome),
            record: best,
            history: None,
        };
        if tx.send(summary).is_err() {
            return;
        }
    }
}

fn summary_line(episode: usize, outcome: &EpisodeOutcome) -> String {
    format!(
        "Episode {episode} | Score: {} | Fitness: {:.2} | {}",
        outcome.score, outcome.fitness, outcome.termination
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use snakevo_engine::Termination;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    #[test]
    fn test_parse_watch_flags() {
        let args = CommandArgs::parse_from(["snakevo", "watch", "--model", "a.json", "--width", "320"]);
        let Some(Mode::Watch(arg)) = args.mode else {
            panic!("expected watch mode");
        };
        assert_eq!(arg.model, PathBuf::from("a.json"));
        assert_eq!(arg.game.to_config().unwrap().width(), 320);
    }

    #[test]
    fn test_summary_line() {
        let outcome = EpisodeOutcome {
            fitness: 31.456,
            score: 3,
            steps: 120,
            termination: Termination::Collision,
        };
        assert_eq!(
            summary_line(7, &outcome),
            "Episode 7 | Score: 3 | Fitness: 31.46 | collision"
        );
    }
}
