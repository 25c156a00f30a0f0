//! Policy evaluation for the snake game.
//!
//! - [`observation`] - the 12-value state encoding a policy sees
//! - [`policy`] - the fixed 12→512→3 feedforward network that is an agent's genome
//! - [`episode`] - playing one policy through one full episode
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use snakevo_engine::GameSeed;
//! use snakevo_evaluator::{
//!     episode::{EpisodeRunner, NoopObserver},
//!     policy::PolicyNetwork,
//! };
//!
//! let network = PolicyNetwork::random(&mut Pcg32::seed_from_u64(0));
//! let outcome = EpisodeRunner::default().run(&network, GameSeed::from_u64(0), NoopObserver);
//! assert!(outcome.steps > 0);
//! ```

pub mod episode;
pub mod observation;
pub mod policy;
