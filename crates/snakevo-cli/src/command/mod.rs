use clap::{Parser, Subcommand};

use self::{train::TrainArg, watch::WatchArg};

mod game_arg;
mod monitor;
mod train;
mod watch;

/// Genome file read at startup and written on every new record.
const DEFAULT_MODEL_PATH: &str = "best_model.json";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in (defaults to `train`)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve snake policies with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Let a saved genome play episodes in the terminal
    Watch(#[clap(flatten)] WatchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Watch(arg) => watch::run(&arg)?,
    }
    Ok(())
}
