//! Training pipeline for the Q-learning predictor

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, Opponent, Predictor},
    predictors::PredictorStats,
    q_learning::QLearningPredictor,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training rounds, one learning update each
    pub episodes: usize,

    /// Random seed for the learner; the opponent gets `seed + 1`
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub const DEFAULT_EPISODES: usize = 10_000;
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: Self::DEFAULT_EPISODES,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Rounds played
    pub episodes: usize,

    /// Name of the training opponent
    pub opponent: String,

    /// Score over the training rounds
    pub stats: PredictorStats,

    /// Exploration rate after the last update
    pub final_epsilon: f64,

    /// States present in the Q-table
    pub states_learned: usize,

    /// Whether a snapshot was written to the store
    pub snapshot_saved: bool,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a Q-learner against a single opponent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `learner` against `opponent`.
    ///
    /// Returns `Ok(None)` if the learner was already trained.
    pub fn run(
        &mut self,
        learner: &mut QLearningPredictor,
        opponent: &mut dyn Opponent,
    ) -> Result<Option<TrainingResult>> {
        if learner.is_trained() {
            return Ok(None);
        }

        if let Some(seed) = self.config.seed {
            learner.set_rng_seed(seed);
            opponent.set_rng_seed(seed.wrapping_add(1));
        }

        learner.train_observed(opponent, self.config.episodes, &mut self.observers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        opponents::UniformOpponent, pipeline::MetricsObserver, q_learning::Hyperparameters,
    };

    #[test]
    fn run_reports_every_episode() {
        let mut learner = QLearningPredictor::new(Hyperparameters::default()).unwrap();
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 200,
            seed: Some(9),
        })
        .with_observer(Box::new(MetricsObserver::new()));

        let result = pipeline
            .run(&mut learner, &mut UniformOpponent::new())
            .unwrap()
            .unwrap();

        assert_eq!(result.episodes, 200);
        assert_eq!(result.stats.total_games, 200);
        assert_eq!(learner.episodes(), 200);
        assert!(!result.snapshot_saved);
        assert!(result.final_epsilon < 1.0);
        assert!(result.states_learned > 1);
    }

    #[test]
    fn trained_learner_keeps_its_rng() {
        let mut pipeline = TrainingPipeline::new(TrainingConfig {
            episodes: 50,
            seed: Some(4),
        });
        let mut learner = QLearningPredictor::new(Hyperparameters::default()).unwrap();
        pipeline
            .run(&mut learner, &mut UniformOpponent::new())
            .unwrap()
            .unwrap();
        let mut twin = learner.clone();

        assert!(
            pipeline
                .run(&mut learner, &mut UniformOpponent::new())
                .unwrap()
                .is_none()
        );
        let moves: Vec<_> = (0..20).map(|_| learner.forecast()).collect();
        let expected: Vec<_> = (0..20).map(|_| twin.forecast()).collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let mut learner = QLearningPredictor::new(Hyperparameters::default()).unwrap();
            TrainingPipeline::new(TrainingConfig {
                episodes: 100,
                seed: Some(21),
            })
            .run(&mut learner, &mut UniformOpponent::new())
            .unwrap()
            .unwrap()
            .stats
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn result_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = TrainingResult {
            episodes: 3,
            opponent: "Uniform".to_string(),
            stats: PredictorStats::new(2, 1, 0),
            final_epsilon: 0.5,
            states_learned: 4,
            snapshot_saved: true,
        };
        result.save(&path).unwrap();

        let loaded = TrainingResult::load(&path).unwrap();
        assert_eq!(loaded.stats, result.stats);
        assert_eq!(loaded.opponent, "Uniform");
    }
}
