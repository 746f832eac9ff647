//! Predictor port - the contract shared by every prediction strategy
//!
//! A predictor guesses the opponent's next move, answers with the move that
//! beats the guess, and learns from the real outcome once the round is over.

use crate::{
    predictors::record::{MatchRecord, PredictorStats},
    rps::{Move, counter},
};

/// A guess about the opponent together with the move that answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Move the opponent is expected to play
    pub expected: Move,
    /// Move the predictor plays, always `counter(expected)`
    pub play: Move,
}

impl Prediction {
    pub fn expecting(expected: Move) -> Self {
        Self {
            expected,
            play: counter(expected),
        }
    }
}

/// Predictor trait - unified interface for all prediction strategies
///
/// Callers drive a strict alternation: [`Predictor::forecast`] (or
/// [`Predictor::predict`]) for a round, then [`Predictor::update`] once the
/// opponent's move is known.
///
/// # Examples
///
/// ```
/// use rps_predictor::{
///     ports::Predictor,
///     predictors::RandomPredictor,
///     rps::Move,
/// };
///
/// let mut predictor = RandomPredictor::new().with_seed(7);
/// let ai_move = predictor.predict();
/// predictor.update(Move::Rock, ai_move);
/// assert_eq!(predictor.stats().total_games, 1);
/// ```
pub trait Predictor: Send {
    /// Guess the opponent's next move and choose the answer.
    ///
    /// May record whatever pending bookkeeping the strategy needs for the
    /// next [`Predictor::update`]. Never touches history or score.
    fn forecast(&mut self) -> Prediction;

    /// Move to play this round.
    fn predict(&mut self) -> Move {
        self.forecast().play
    }

    /// Record a completed round and let the strategy learn from it.
    ///
    /// Calling this without a preceding forecast still records the round;
    /// strategies that need a pending prediction skip their learning step.
    fn update(&mut self, opponent_move: Move, ai_move: Move);

    /// History and score bookkeeping.
    fn record(&self) -> &MatchRecord;

    /// Current win/loss/tie summary.
    fn stats(&self) -> PredictorStats {
        self.record().stats()
    }

    /// Clear history and score, keeping anything learned.
    fn reset(&mut self);

    /// Clear history, score and every learned table.
    ///
    /// Stateless strategies have nothing beyond the record to forget.
    fn full_reset(&mut self) {
        self.reset();
    }

    /// Strategy name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Reseed the internal random number generator.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
