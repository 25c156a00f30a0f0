use std::{fmt, mem};

use rand::Rng;
use snakevo_evaluator::{
    episode::{EpisodeRunner, FrameObserver},
    policy::PolicyNetwork,
};

use crate::{
    genetic::{
        AgentIdAllocator, EvolutionParams, EvolutionParamsError, GenerationResult, Population,
        PopulationEvolver, RankedAgent,
    },
    statistics::{GenerationStats, ScoreHistory},
};

/// Which agent's genome is saved when a generation sets a new record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RecordPolicy {
    /// The record is the fitness leader's score, and the fitness leader's
    /// genome is saved. An agent with a higher score but lower fitness never
    /// counts.
    #[default]
    FitnessLeader,
    /// The record is the highest score of any agent, and that agent's genome
    /// is saved.
    ScoreLeader,
}

impl RecordPolicy {
    fn holder(self, result: &GenerationResult) -> &RankedAgent {
        match self {
            Self::FitnessLeader => result.fitness_leader(),
            Self::ScoreLeader => result.score_leader(),
        }
    }
}

/// Genome that set a new all-time record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub network: PolicyNetwork,
    pub fitness: f32,
    pub score: usize,
}

/// What one call to [`Trainer::run_generation`] produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// 1-based generation index.
    pub generation: usize,
    pub stats: GenerationStats,
    /// All-time record after this generation.
    pub record: usize,
    /// Set when this generation broke the record.
    pub new_record: Option<NewRecord>,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generation {} | Fit: {:.2} | Score: {} | Mean Fit: {:.2} | Record: {}",
            self.generation,
            self.stats.fitness.max,
            self.stats.leader_score,
            self.stats.fitness.mean,
            self.record,
        )
    }
}

/// Drives the generational loop.
///
/// The caller decides how many generations to run; the trainer has no
/// convergence criterion of its own.
#[derive(Debug)]
pub struct Trainer {
    evolver: PopulationEvolver,
    record_policy: RecordPolicy,
    ids: AgentIdAllocator,
    population: Population,
    generation: usize,
    record: usize,
    history: ScoreHistory,
}

impl Trainer {
    /// Creates a trainer with its initial population.
    ///
    /// With a `seed_genome` the population descends from it (see
    /// [`Population::seeded`]); otherwise every agent is random.
    pub fn new<R>(
        params: EvolutionParams,
        record_policy: RecordPolicy,
        seed_genome: Option<&PolicyNetwork>,
        rng: &mut R,
    ) -> Result<Self, EvolutionParamsError>
    where
        R: Rng + ?Sized,
    {
        let evolver = PopulationEvolver::new(params)?;
        let mut ids = AgentIdAllocator::new();
        let population = match seed_genome {
            Some(genome) => Population::seeded(genome, &params, &mut ids, rng),
            None => Population::random(params.population_size, &mut ids, rng),
        };
        Ok(Self {
            evolver,
            record_policy,
            ids,
            population,
            generation: 0,
            record: 0,
            history: ScoreHistory::new(),
        })
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        self.evolver.params()
    }

    #[must_use]
    pub fn record_policy(&self) -> RecordPolicy {
        self.record_policy
    }

    /// Population to be evaluated by the next generation.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn record(&self) -> usize {
        self.record
    }

    #[must_use]
    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    /// Evaluates the current population, updates the record and history, and
    /// replaces the population with the next generation.
    ///
    /// `render` observes the first agent's episode only.
    pub fn run_generation<O, R>(
        &mut self,
        runner: &EpisodeRunner,
        render: O,
        rng: &mut R,
    ) -> GenerationReport
    where
        O: FrameObserver,
        R: Rng + ?Sized,
    {
        self.generation += 1;

        let population = mem::take(&mut self.population);
        let result = population.evaluate(runner, render, rng);
        let stats = result.stats();

        let holder = self.record_policy.holder(&result);
        let new_record = (holder.score > self.record).then(|| NewRecord {
            network: holder.agent.network().clone(),
            fitness: holder.fitness,
            score: holder.score,
        });
        if let Some(record) = &new_record {
            self.record = record.score;
        }
        self.history.push(stats.leader_score);

        self.population = self.evolver.evolve(result, &mut self.ids, rng);

        GenerationReport {
            generation: self.generation,
            stats,
            record: self.record,
            new_record,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use snakevo_engine::GameConfig;
    use snakevo_evaluator::episode::NoopObserver;

    use super::*;

    fn small_params() -> EvolutionParams {
        EvolutionParams {
            population_size: 8,
            survivors: 2,
            top_k: 3,
            ..EvolutionParams::DEFAULT
        }
    }

    fn runner() -> EpisodeRunner {
        EpisodeRunner::new(GameConfig::new(200, 160, 20).unwrap())
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = EvolutionParams {
            survivors: 9,
            ..small_params()
        };
        let err = Trainer::new(params, RecordPolicy::default(), None, &mut Pcg32::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, EvolutionParamsError::TooManySurvivors { .. }));
    }

    #[test]
    fn test_seeded_trainer_starts_from_genome() {
        let mut rng = Pcg32::seed_from_u64(1);
        let genome = PolicyNetwork::random(&mut rng);
        let trainer =
            Trainer::new(small_params(), RecordPolicy::default(), Some(&genome), &mut rng).unwrap();
        assert_eq!(trainer.population().len(), 8);
        assert_eq!(trainer.population().agents()[0].network(), &genome);
    }

    #[test]
    fn test_generations_update_record_and_history() {
        let mut rng = Pcg32::seed_from_u64(2);
        let runner = runner();
        for policy in [RecordPolicy::FitnessLeader, RecordPolicy::ScoreLeader] {
            let mut trainer = Trainer::new(small_params(), policy, None, &mut rng).unwrap();
            let mut record = 0;
            for generation in 1..=4 {
                let report = trainer.run_generation(&runner, NoopObserver, &mut rng);
                assert_eq!(report.generation, generation);
                assert_eq!(trainer.generation(), generation);
                assert_eq!(trainer.population().len(), 8);
                assert!(report.record >= record);
                assert!(report.stats.fitness.max >= report.stats.fitness.mean);
                assert!(report.stats.max_score >= report.stats.leader_score);

                match &report.new_record {
                    Some(new) => {
                        assert!(new.score > record);
                        assert_eq!(new.score, report.record);
                        if policy.is_fitness_leader() {
                            assert_eq!(new.score, report.stats.leader_score);
                            assert!((new.fitness - report.stats.fitness.max).abs() < 1e-6);
                        } else {
                            assert_eq!(new.score, report.stats.max_score);
                        }
                    }
                    None => assert_eq!(report.record, record),
                }
                record = report.record;
            }
            assert_eq!(trainer.history().len(), 4);
            assert_eq!(trainer.record(), record);
        }
    }

    #[test]
    fn test_report_display() {
        let report = GenerationReport {
            generation: 3,
            stats: GenerationStats {
                fitness: crate::statistics::FitnessStats::new([12.345, -4.0, 0.5]).unwrap(),
                leader_score: 2,
                max_score: 4,
            },
            record: 5,
            new_record: None,
        };
        assert_eq!(
            report.to_string(),
            "Generation 3 | Fit: 12.35 | Score: 2 | Mean Fit: 2.95 | Record: 5"
        );
    }
}
