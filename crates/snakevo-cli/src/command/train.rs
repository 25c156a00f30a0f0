use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use anyhow::Context as _;
use chrono::Utc;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use snakevo_engine::SnakeGame;
use snakevo_evaluator::{
    episode::{EpisodeRunner, FrameObserver, NoopObserver},
    policy::PolicyNetwork,
};
use snakevo_training::{
    genetic::EvolutionParams,
    trainer::{GenerationReport, RecordPolicy, Trainer},
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

const MODEL_NAME: &str = "snakevo";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum RecordPolicyArg {
    /// Save the highest-fitness agent when its score beats the record
    #[default]
    FitnessLeader,
    /// Save the highest-scoring agent when its score beats the record
    ScoreLeader,
}

impl From<RecordPolicyArg> for RecordPolicy {
    fn from(value: RecordPolicyArg) -> Self {
        match value {
            RecordPolicyArg::FitnessLeader => Self::FitnessLeader,
            RecordPolicyArg::ScoreLeader => Self::ScoreLeader,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub(crate) struct EvolutionArg {
    /// Agents per generation
    #[arg(long, default_value_t = EvolutionParams::DEFAULT.population_size)]
    population_size: usize,
    /// Top agents carried over unchanged
    #[arg(long, default_value_t = EvolutionParams::DEFAULT.survivors)]
    survivors: usize,
    /// Top agents eligible as parents
    #[arg(long, default_value_t = EvolutionParams::DEFAULT.top_k)]
    top_k: usize,
    /// Per-parameter mutation probability
    #[arg(long, default_value_t = EvolutionParams::DEFAULT.mutation_rate)]
    mutation_rate: f32,
    /// Scale of the Gaussian mutation noise
    #[arg(long, default_value_t = EvolutionParams::DEFAULT.mutation_power)]
    mutation_power: f32,
}

impl Default for EvolutionArg {
    fn default() -> Self {
        let params = EvolutionParams::DEFAULT;
        Self {
            population_size: params.population_size,
            survivors: params.survivors,
            top_k: params.top_k,
            mutation_rate: params.mutation_rate,
            mutation_power: params.mutation_power,
        }
    }
}

impl From<EvolutionArg> for EvolutionParams {
    fn from(arg: EvolutionArg) -> Self {
        Self {
            population_size: arg.population_size,
            survivors: arg.survivors,
            top_k: arg.top_k,
            mutation_rate: arg.mutation_rate,
            mutation_power: arg.mutation_power,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Genome file to start from and to save records to
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Print progress to stderr instead of showing the terminal view
    #[arg(long)]
    headless: bool,
    /// Seed for reproducible training
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many generations (runs forever by default)
    #[arg(long)]
    generations: Option<usize>,
    /// Which agent's genome is saved on a new record
    #[arg(long, value_enum, default_value_t)]
    record_policy: RecordPolicyArg,
    #[clap(flatten)]
    game: GameArg,
    #[clap(flatten)]
    evolution: EvolutionArg,
}

impl Default for TrainArg {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            headless: false,
            seed: None,
            generations: None,
            record_policy: RecordPolicyArg::default(),
            game: GameArg::default(),
            evolution: EvolutionArg::default(),
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        model,
        headless,
        seed,
        generations,
        record_policy,
        game,
        evolution,
    } = arg;

    let config = game.to_config()?;
    let mut rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(*seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let (seed_genome, load_message) = load_seed_genome(model);
    let trainer = Trainer::new(
        EvolutionParams::from(*evolution),
        RecordPolicy::from(*record_policy),
        seed_genome.as_ref(),
        &mut rng,
    )
    .context("Invalid evolution parameters")?;

    let mut session = TrainingSession {
        trainer,
        runner: EpisodeRunner::new(config),
        rng,
        model_path: model.clone(),
        generations: *generations,
    };

    if *headless {
        eprintln!("{load_message}");
        session.run_headless();
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut app = MonitorApp::new("snakevo - training", SnakeGame::new(config), rx).with_chart();
    let _ = tx.send(MonitorEvent::Log(load_message));
    thread::spawn(move || session.run_monitored(&tx));
    Runtime::new().run(&mut app)?;
    Ok(())
}

/// Opens the saved genome, if there is a usable one.
///
/// Failing to load is not an error: training then starts from a random
/// population. The returned message says which case applied.
fn load_seed_genome(path: &Path) -> (Option<PolicyNetwork>, String) {
    if !path.exists() {
        let message = format!(
            "No saved genome at {}, starting from a random population",
            path.display()
        );
        return (None, message);
    }
    match GenomeModel::open(path) {
        Ok(model) => {
            let message = format!(
                "Loaded genome from {} (generation {}, score {})",
                path.display(),
                model.generation,
                model.score
            );
            (Some(model.network), message)
        }
        Err(err) => (
            None,
            format!("{err:#}; starting from a random population"),
        ),
    }
}

#[derive(Debug)]
struct TrainingSession {
    trainer: Trainer,
    runner: EpisodeRunner,
    rng: Pcg32,
    model_path: PathBuf,
    generations: Option<usize>,
}

impl TrainingSession {
    fn is_finished(&self) -> bool {
        self.generations
            .is_some_and(|limit| self.trainer.generation() >= limit)
    }

    /// Runs one generation and saves the genome if it set a new record.
    ///
    /// Returns the report and, when a save was attempted, a message about it.
    fn step<O>(&mut self, render: O) -> (GenerationReport, Option<String>)
    where
        O: FrameObserver,
    {
        let mut report = self
            .trainer
            .run_generation(&self.runner, render, &mut self.rng);
        let message = report.new_record.take().map(|record| {
            let model = GenomeModel {
                name: MODEL_NAME.to_owned(),
                trained_at: Utc::now(),
                generation: report.generation,
                fitness: record.fitness,
                score: record.score,
                network: record.network,
            };
            match model.save(&self.model_path) {
                Ok(()) => format!(
                    "New record {}: saved genome to {}",
                    model.score,
                    self.model_path.display()
                ),
                Err(err) => format!("{err:#}"),
            }
        });
        (report, message)
    }

    fn run_headless(&mut self) {
        while !self.is_finished() {
            let (report, message) = self.step(NoopObserver);
            eprintln!("{report}");
            if let Some(message) = message {
                eprintln!("  {message}");
            }
        }
    }

    /// Streams frames of the first agent and one summary per generation.
    ///
    /// Returns once the generation limit is reached or the view has closed.
    fn run_monitored(&mut self, tx: &mpsc::Sender<MonitorEvent>) {
        while !self.is_finished() {
            let (report, message) = self.step(FrameSender::new(tx.clone()));
            let summary = MonitorEvent::Summary {
                line: report.to_string(),
                record: report.record,
                history: Some(self.trainer.history().clone()),
            };
            if tx.send(summary).is_err() {
                return;
            }
            if let Some(message) = message
                && tx.send(MonitorEvent::Log(message)).is_err()
            {
                return;
            }
        }
    }
}
