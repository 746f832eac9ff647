//! Prediction strategies
//!
//! - **Random**: stateless baseline, expected to win a third of all rounds
//! - **Markov**: order-k transition counts over the opponent's history
//!
//! The Q-learning strategy lives in [`crate::q_learning`].

pub mod markov;
pub mod random;
pub mod record;

use rand::{SeedableRng, rngs::StdRng};

pub use markov::{
    DEFAULT_ORDER, MAX_ORDER, MIN_FREQUENCY_SAMPLES, MIN_STATE_OBSERVATIONS, MarkovPredictor,
    TransitionTable, WindowKey,
};
pub use random::RandomPredictor;
pub use record::{MatchRecord, PredictorStats};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}
