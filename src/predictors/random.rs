//! Uniform random baseline

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{build_rng, record::MatchRecord};
use crate::{
    ports::{Prediction, Predictor},
    rps::Move,
};

/// Predicts a uniformly random opponent move and plays its counter.
///
/// Never learns; against any opponent the expected win, loss and tie rates
/// are each one third.
#[derive(Debug, Clone)]
pub struct RandomPredictor {
    record: MatchRecord,
    rng: StdRng,
}

impl RandomPredictor {
    pub fn new() -> Self {
        Self {
            record: MatchRecord::new(),
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for RandomPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for RandomPredictor {
    fn forecast(&mut self) -> Prediction {
        let expected = *Move::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Move::Rock);
        Prediction::expecting(expected)
    }

    fn update(&mut self, opponent_move: Move, ai_move: Move) {
        self.record.record(opponent_move, ai_move);
    }

    fn record(&self) -> &MatchRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.clear();
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
