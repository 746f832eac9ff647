//! Configuration types for predictor creation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    opponents::OpponentKind,
    pipeline::TrainingConfig,
    predictors::{DEFAULT_ORDER, MAX_ORDER},
    q_learning::Hyperparameters,
};

/// Prediction strategy selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictorKind {
    Random,
    #[default]
    Markov,
    QLearning,
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PredictorKind::Random => "random",
            PredictorKind::Markov => "markov",
            PredictorKind::QLearning => "q-learning",
        };
        f.write_str(label)
    }
}

impl FromStr for PredictorKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "random" | "1" => Ok(PredictorKind::Random),
            "markov" | "2" => Ok(PredictorKind::Markov),
            "q-learning" | "qlearning" | "q" | "3" => Ok(PredictorKind::QLearning),
            _ => Err(crate::Error::ParsePredictor {
                input: s.to_string(),
                expected: "random/1, markov/2, q-learning/3".to_string(),
            }),
        }
    }
}

/// Configuration for a Markov predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkovConfig {
    /// Number of past opponent moves conditioned on
    pub order: usize,
    /// Random seed for the fallback guess
    pub seed: Option<u64>,
}

impl MarkovConfig {
    pub fn new(order: usize) -> Self {
        Self { order, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "Markov order must be between 1 and {MAX_ORDER}, got {}",
                    self.order
                ),
            });
        }
        Ok(())
    }
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

/// Configuration for a Q-learning predictor and its initial training.
///
/// # Examples
///
/// ```
/// use rps_predictor::app::QLearningConfig;
/// use rps_predictor::opponents::OpponentKind;
///
/// let config = QLearningConfig::default()
///     .with_discount_factor(0.8)
///     .with_training(5_000, OpponentKind::Repeater)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    pub discount_factor: f64,
    pub epsilon: f64,
    pub decay_rate: f64,
    /// Rounds played by an untrained learner before it is handed out
    pub training_episodes: usize,
    pub training_opponent: OpponentKind,
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn with_training(mut self, episodes: usize, opponent: OpponentKind) -> Self {
        self.training_episodes = episodes;
        self.training_opponent = opponent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            discount_factor: self.discount_factor,
            epsilon: self.epsilon,
            decay_rate: self.decay_rate,
            seed: self.seed,
        }
    }

    pub fn training(&self) -> TrainingConfig {
        TrainingConfig {
            episodes: self.training_episodes,
            seed: self.seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.hyperparameters().validate()
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            discount_factor: Hyperparameters::DEFAULT_DISCOUNT,
            epsilon: Hyperparameters::DEFAULT_EPSILON,
            decay_rate: Hyperparameters::DEFAULT_DECAY,
            training_episodes: TrainingConfig::DEFAULT_EPISODES,
            training_opponent: OpponentKind::SlightBias,
            seed: None,
        }
    }
}

/// Configuration for creating any predictor through the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub kind: PredictorKind,
    pub markov: MarkovConfig,
    pub q_learning: QLearningConfig,
    /// Seed applied to whichever strategy is built
    pub seed: Option<u64>,
}

impl PredictorConfig {
    pub fn new(kind: PredictorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_markov(mut self, markov: MarkovConfig) -> Self {
        self.markov = markov;
        self
    }

    pub fn with_q_learning(mut self, q_learning: QLearningConfig) -> Self {
        self.q_learning = q_learning;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the settings of the selected strategy only.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            PredictorKind::Random => Ok(()),
            PredictorKind::Markov => self.markov.validate(),
            PredictorKind::QLearning => self.q_learning.validate(),
        }
    }
}
