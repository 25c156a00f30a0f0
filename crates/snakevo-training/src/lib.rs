//! Evolution of snake policies with a generational genetic algorithm.
//!
//! No gradients are involved: the weights of every [`PolicyNetwork`] change
//! only through copying and Gaussian mutation, and fitness is the total reward
//! of one episode.
//!
//! # Architecture
//!
//! ```text
//! Trainer
//!     ↓ owns
//! Population (agents, each owning a PolicyNetwork)
//!     ↓ plays through
//! EpisodeRunner (snakevo-evaluator)
//!     ↓ produces
//! GenerationResult (ranked by fitness)
//!     ↓ fed to
//! PopulationEvolver → next Population
//! ```
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use snakevo_engine::GameConfig;
//! use snakevo_evaluator::episode::{EpisodeRunner, NoopObserver};
//! use snakevo_training::{genetic::EvolutionParams, trainer::{RecordPolicy, Trainer}};
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let params = EvolutionParams { population_size: 4, survivors: 1, top_k: 2, ..Default::default() };
//! let runner = EpisodeRunner::new(GameConfig::new(120, 120, 20)?);
//! let mut trainer = Trainer::new(params, RecordPolicy::default(), None, &mut rng)?;
//! let report = trainer.run_generation(&runner, NoopObserver, &mut rng);
//! assert_eq!(report.generation, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`PolicyNetwork`]: snakevo_evaluator::policy::PolicyNetwork

pub mod genetic;
pub mod statistics;
pub mod trainer;
