//! Shared argument groups for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    app::{App, DEFAULT_SNAPSHOT_DIR, MarkovConfig, PredictorConfig, PredictorKind, QLearningConfig},
    opponents::OpponentKind,
    pipeline::TrainingConfig,
    predictors::DEFAULT_ORDER,
    q_learning::Hyperparameters,
};

/// Q-learning hyperparameters, snapshot location and seed
#[derive(Args, Debug, Clone)]
pub struct LearnerArgs {
    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = Hyperparameters::DEFAULT_DISCOUNT)]
    pub discount: f64,

    /// Initial exploration rate ε (0.0-1.0)
    #[arg(long, default_value_t = Hyperparameters::DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Multiplicative ε decay per learning update (0.0-1.0)
    #[arg(long, default_value_t = Hyperparameters::DEFAULT_DECAY)]
    pub decay: f64,

    /// Training rounds for an untrained Q-learner
    #[arg(long, default_value_t = TrainingConfig::DEFAULT_EPISODES)]
    pub episodes: usize,

    /// Opponent an untrained Q-learner trains against
    #[arg(long, default_value = "slight-bias")]
    pub train_opponent: String,

    /// Directory holding Q-table snapshots
    #[arg(long, default_value = DEFAULT_SNAPSHOT_DIR)]
    pub snapshots: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl LearnerArgs {
    pub fn app(&self) -> App {
        App::with_snapshot_dir(&self.snapshots)
    }

    pub fn train_opponent(&self) -> Result<OpponentKind> {
        self.train_opponent
            .parse()
            .context("Invalid --train-opponent")
    }

    pub fn q_learning_config(&self) -> Result<QLearningConfig> {
        let mut config = QLearningConfig::default()
            .with_discount_factor(self.discount)
            .with_epsilon(self.epsilon)
            .with_decay_rate(self.decay)
            .with_training(self.episodes, self.train_opponent()?);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
            .validate()
            .context("Invalid Q-learning hyperparameters")?;
        Ok(config)
    }
}

/// Predictor selection on top of the learner settings
#[derive(Args, Debug, Clone)]
pub struct PredictorArgs {
    /// Prediction strategy (random, markov, or q-learning)
    #[arg(long, short = 'p', default_value = "markov")]
    pub predictor: String,

    /// Markov order: number of past opponent moves conditioned on
    #[arg(long, default_value_t = DEFAULT_ORDER)]
    pub order: usize,

    #[command(flatten)]
    pub learner: LearnerArgs,
}

impl PredictorArgs {
    pub fn predictor_kind(&self) -> Result<PredictorKind> {
        self.predictor.parse().context("Invalid --predictor")
    }

    /// Full configuration for the selected predictor.
    pub fn predictor_config(&self) -> Result<PredictorConfig> {
        let kind = self.predictor_kind()?;
        let mut config = PredictorConfig::new(kind).with_markov(MarkovConfig::new(self.order));
        if kind == PredictorKind::QLearning {
            config = config.with_q_learning(self.learner.q_learning_config()?);
        }
        if let Some(seed) = self.learner.seed {
            config = config.with_seed(seed);
        }
        config.validate().context("Invalid predictor configuration")?;
        Ok(config)
    }
}
