//! Per-generation summaries and the score history plotted during training.

use crate::genetic::GenerationResult;

/// Descriptive statistics of fitness values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
}

impl FitnessStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// ```
    /// # use snakevo_training::statistics::FitnessStats;
    /// let stats = FitnessStats::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Fitness over the whole population.
    pub fitness: FitnessStats,
    /// Score of the fitness leader. This is the "best score" of a generation.
    pub leader_score: usize,
    /// Highest score of any agent, which may differ from `leader_score`.
    pub max_score: usize,
}

impl GenerationStats {
    /// # Panics
    ///
    /// Panics if the generation is empty.
    #[must_use]
    pub fn from_result(result: &GenerationResult) -> Self {
        let fitness = FitnessStats::new(result.entries().iter().map(|e| e.fitness))
            .expect("generation must not be empty");
        Self {
            fitness,
            leader_score: result.fitness_leader().score,
            max_score: result.score_leader().score,
        }
    }
}

/// Best score of every generation with its running mean.
///
/// `means[i]` is the average of `scores[..=i]`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScoreHistory {
    scores: Vec<usize>,
    means: Vec<f64>,
    total: usize,
}

impl ScoreHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, score: usize) {
        self.scores.push(score);
        self.total += score;
        #[expect(clippy::cast_precision_loss)]
        let mean = self.total as f64 / self.scores.len() as f64;
        self.means.push(mean);
    }

    #[must_use]
    pub fn scores(&self) -> &[usize] {
        &self.scores
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Latest score and running mean.
    #[must_use]
    pub fn last(&self) -> Option<(usize, f64)> {
        Some((*self.scores.last()?, *self.means.last()?))
    }

    #[must_use]
    pub fn max_score(&self) -> usize {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_stats_empty() {
        assert_eq!(FitnessStats::new([]), None);
    }

    #[test]
    fn test_fitness_stats_single_value() {
        let stats = FitnessStats::new([-12.5]).unwrap();
        assert_eq!(stats.min, -12.5);
        assert_eq!(stats.max, -12.5);
        assert_eq!(stats.mean, -12.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_fitness_stats_std_dev() {
        let stats = FitnessStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-6);
        assert!((stats.std_dev - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_history_running_mean() {
        let mut history = ScoreHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);

        for score in [2, 0, 4, 6] {
            history.push(score);
        }
        assert_eq!(history.scores(), &[2, 0, 4, 6]);
        assert_eq!(history.means(), &[2.0, 1.0, 2.0, 3.0]);
        assert_eq!(history.last(), Some((6, 3.0)));
        assert_eq!(history.max_score(), 6);
    }
}
