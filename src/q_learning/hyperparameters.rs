//! Hyperparameters of the Q-learning predictor

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Discount factor, exploration schedule and seed.
///
/// The learning rate is not a hyperparameter: it adapts per state-action as
/// 1 / (1 + visits).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate ε
    pub epsilon: f64,
    /// Multiplicative decay applied to ε after every learning step
    pub decay_rate: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Hyperparameters {
    pub const DEFAULT_DISCOUNT: f64 = 0.9;
    pub const DEFAULT_EPSILON: f64 = 1.0;
    pub const DEFAULT_DECAY: f64 = 0.999;

    pub fn new(discount_factor: f64, epsilon: f64, decay_rate: f64) -> Self {
        Self {
            discount_factor,
            epsilon,
            decay_rate,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every rate lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("discount factor", self.discount_factor),
            ("epsilon", self.epsilon),
            ("decay rate", self.decay_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_DISCOUNT,
            Self::DEFAULT_EPSILON,
            Self::DEFAULT_DECAY,
        )
    }
}
