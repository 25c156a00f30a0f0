//! Generational genetic algorithm over policy networks.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate** - every agent plays one episode; its accumulated reward is its fitness
//! 2. **Rank** - agents are sorted by fitness, best first
//! 3. **Survive** - the top `survivors` agents move into the next generation unchanged
//! 4. **Breed** - children are copies of a parent drawn uniformly from the top `top_k`,
//!    followed by Gaussian mutation, until the population is full again
//!
//! There is no crossover and no tournament; selection pressure comes only from
//! truncation.
//!
//! # Key Components
//!
//! - [`EvolutionParams`] - population size, selection sizes and mutation strength
//! - [`Agent`] - one genome plus its identity and bookkeeping
//! - [`Population`] - ordered, fixed-size set of agents for one generation
//! - [`GenerationResult`] - ranked evaluation results of one generation
//! - [`PopulationEvolver`] - builds the next population from a ranked result
//!
//! # Ranking Ties
//!
//! Ranking uses a stable sort, so agents with equal fitness keep their
//! population order. Since survivors are placed first in the next population,
//! an older agent wins a tie against a newer one.

use std::cmp::Ordering;

use rand::{Rng, seq::IndexedRandom as _};
use snakevo_engine::GameSeed;
use snakevo_evaluator::{
    episode::{EpisodeRunner, FrameObserver, NoopObserver},
    policy::PolicyNetwork,
};

use crate::statistics::GenerationStats;

/// Error returned by [`EvolutionParams::validate`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolutionParamsError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("survivors ({survivors}) exceed the population size ({population_size})")]
    TooManySurvivors {
        survivors: usize,
        population_size: usize,
    },
    #[display("top-k ({top_k}) must be between 1 and the population size ({population_size})")]
    InvalidTopK { top_k: usize, population_size: usize },
    #[display("mutation rate must be in [0, 1], got {_0}")]
    InvalidMutationRate(#[error(not(source))] f32),
    #[display("mutation power must be finite and non-negative, got {_0}")]
    InvalidMutationPower(#[error(not(source))] f32),
}

/// Parameters of the genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    /// Number of agents in every generation.
    pub population_size: usize,
    /// Top-ranked agents carried over unchanged.
    pub survivors: usize,
    /// Top-ranked agents eligible as parents.
    pub top_k: usize,
    /// Per-parameter mutation probability.
    pub mutation_rate: f32,
    /// Scale of the Gaussian noise added to a mutated parameter.
    pub mutation_power: f32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl EvolutionParams {
    pub const DEFAULT: Self = Self {
        population_size: 100,
        survivors: 20,
        top_k: 20,
        mutation_rate: 0.05,
        mutation_power: 0.2,
    };

    pub fn validate(&self) -> Result<(), EvolutionParamsError> {
        let Self {
            population_size,
            survivors,
            top_k,
            mutation_rate,
            mutation_power,
        } = *self;
        if population_size == 0 {
            return Err(EvolutionParamsError::EmptyPopulation);
        }
        if survivors > population_size {
            return Err(EvolutionParamsError::TooManySurvivors {
                survivors,
                population_size,
            });
        }
        if top_k == 0 || top_k > population_size {
            return Err(EvolutionParamsError::InvalidTopK {
                top_k,
                population_size,
            });
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(EvolutionParamsError::InvalidMutationRate(mutation_rate));
        }
        if !mutation_power.is_finite() || mutation_power < 0.0 {
            return Err(EvolutionParamsError::InvalidMutationPower(mutation_power));
        }
        Ok(())
    }

    /// Number of children bred every generation.
    #[must_use]
    pub const fn children(&self) -> usize {
        self.population_size - self.survivors
    }
}

/// Identity of an agent, unique within one training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("#{_0}")]
pub struct AgentId(u64);

/// Hands out increasing [`AgentId`]s.
#[derive(Debug, Default, Clone)]
pub struct AgentIdAllocator {
    next: u64,
}

impl AgentIdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }
}

/// A single member of the population.
///
/// The agent owns its network exclusively.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    parent: Option<AgentId>,
    network: PolicyNetwork,
    episodes: usize,
}

impl Agent {
    #[must_use]
    pub fn new(id: AgentId, network: PolicyNetwork) -> Self {
        Self {
            id,
            parent: None,
            network,
            episodes: 0,
        }
    }

    /// Creates a mutated copy of `parent`.
    pub fn child<R>(id: AgentId, parent: &Self, rate: f32, power: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::bred(id, parent, parent.network.clone(), rate, power, rng)
    }

    /// Like [`Self::child`], but copies the parent into `buffer` instead of
    /// allocating a new network.
    pub fn child_reusing<R>(
        id: AgentId,
        parent: &Self,
        mut buffer: PolicyNetwork,
        rate: f32,
        power: f32,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        buffer.copy_from(&parent.network);
        Self::bred(id, parent, buffer, rate, power, rng)
    }

    fn bred<R>(
        id: AgentId,
        parent: &Self,
        mut network: PolicyNetwork,
        rate: f32,
        power: f32,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        network.mutate(rate, power, rng);
        Self {
            id,
            parent: Some(parent.id),
            network,
            episodes: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The agent this one was bred from, if any.
    #[must_use]
    pub fn parent(&self) -> Option<AgentId> {
        self.parent
    }

    #[must_use]
    pub fn network(&self) -> &PolicyNetwork {
        &self.network
    }

    /// Episodes played over the agent's lifetime, survivors included.
    #[must_use]
    pub fn episodes(&self) -> usize {
        self.episodes
    }
}

/// Ordered set of agents making up one generation.
#[derive(Debug, Default, Clone)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Creates `count` agents with freshly initialized networks.
    pub fn random<R>(count: usize, ids: &mut AgentIdAllocator, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let agents = (0..count)
            .map(|_| Agent::new(ids.allocate(), PolicyNetwork::random(rng)))
            .collect();
        Self { agents }
    }

    /// Creates a population descended from a previously saved genome.
    ///
    /// The first agent is an exact copy of `genome`; every other agent is a
    /// mutated copy.
    pub fn seeded<R>(
        genome: &PolicyNetwork,
        params: &EvolutionParams,
        ids: &mut AgentIdAllocator,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let elite = Agent::new(ids.allocate(), genome.clone());
        let mut agents = Vec::with_capacity(params.population_size);
        for _ in 1..params.population_size {
            agents.push(Agent::child(
                ids.allocate(),
                &elite,
                params.mutation_rate,
                params.mutation_power,
                rng,
            ));
        }
        agents.insert(0, elite);
        Self { agents }
    }

    #[must_use]
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Plays one episode per agent, in population order, and ranks the results.
    ///
    /// Only the first agent's episode is shown to `render`; everyone else runs
    /// with [`NoopObserver`]. Each episode gets its own food seed drawn from
    /// `rng`.
    pub fn evaluate<O, R>(self, runner: &EpisodeRunner, render: O, rng: &mut R) -> GenerationResult
    where
        O: FrameObserver,
        R: Rng + ?Sized,
    {
        let mut render = Some(render);
        let entries = self
            .agents
            .into_iter()
            .map(|mut agent| {
                let seed: GameSeed = rng.random();
                let outcome = match render.take() {
                    Some(observer) => runner.run(&agent.network, seed, observer),
                    None => runner.run(&agent.network, seed, NoopObserver),
                };
                agent.episodes += 1;
                RankedAgent {
                    agent,
                    fitness: outcome.fitness,
                    score: outcome.score,
                }
            })
            .collect();
        GenerationResult::new(entries)
    }
}

/// One agent with the outcome of its episode.
#[derive(Debug, Clone)]
pub struct RankedAgent {
    pub agent: Agent,
    pub fitness: f32,
    /// Food eaten during the episode.
    pub score: usize,
}

/// Evaluation results of one generation, best fitness first.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    entries: Vec<RankedAgent>,
}

impl GenerationResult {
    /// Ranks `entries` by fitness, descending.
    ///
    /// The sort is stable: entries with equal fitness keep their input order.
    #[must_use]
    pub fn new(mut entries: Vec<RankedAgent>) -> Self {
        entries.sort_by(|a, b| compare_fitness_desc(a.fitness, b.fitness));
        Self { entries }
    }

    /// Ranked entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[RankedAgent] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the highest fitness.
    ///
    /// # Panics
    ///
    /// Panics if the generation is empty.
    #[must_use]
    pub fn fitness_leader(&self) -> &RankedAgent {
        &self.entries[0]
    }

    /// Entry with the highest score; ties go to the better-ranked entry.
    ///
    /// # Panics
    ///
    /// Panics if the generation is empty.
    #[must_use]
    pub fn score_leader(&self) -> &RankedAgent {
        let mut leader = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.score > leader.score {
                leader = entry;
            }
        }
        leader
    }

    #[must_use]
    pub fn stats(&self) -> GenerationStats {
        GenerationStats::from_result(self)
    }

    fn is_ranked(&self) -> bool {
        self.entries
            .is_sorted_by(|a, b| compare_fitness_desc(a.fitness, b.fitness).is_le())
    }
}

fn compare_fitness_desc(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

/// Builds the next generation from a ranked [`GenerationResult`].
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    params: EvolutionParams,
}

impl PopulationEvolver {
    pub fn new(params: EvolutionParams) -> Result<Self, EvolutionParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Evolves a ranked generation into the next population.
    ///
    /// The next population holds the top `survivors` agents first, moved over
    /// in rank order, followed by freshly bred children until it reaches
    /// `population_size`. Parents are drawn uniformly, with replacement, from
    /// the top `top_k` agents.
    ///
    /// # Panics
    ///
    /// Panics if `result` has fewer entries than `survivors` or `top_k`.
    pub fn evolve<R>(
        &self,
        result: GenerationResult,
        ids: &mut AgentIdAllocator,
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        let EvolutionParams {
            population_size,
            survivors,
            top_k,
            mutation_rate,
            mutation_power,
        } = self.params;
        assert!(result.is_ranked());
        assert!(result.len() >= survivors.max(top_k));

        let mut ranked: Vec<Agent> = result.entries.into_iter().map(|e| e.agent).collect();
        // networks of agents that neither survive nor breed are recycled for children
        let mut spare: Vec<PolicyNetwork> = ranked
            .split_off(survivors.max(top_k))
            .into_iter()
            .map(|agent| agent.network)
            .collect();

        let breeders = &ranked[..top_k];
        let mut children = Vec::with_capacity(population_size - survivors);
        while survivors + children.len() < population_size {
            let Some(parent) = breeders.choose(rng) else {
                break;
            };
            let id = ids.allocate();
            let child = match spare.pop() {
                Some(buffer) => {
                    Agent::child_reusing(id, parent, buffer, mutation_rate, mutation_power, rng)
                }
                None => Agent::child(id, parent, mutation_rate, mutation_power, rng),
            };
            children.push(child);
        }

        ranked.truncate(survivors);
        ranked.extend(children);
        Population { agents: ranked }
    }
}
