//! Opponent port - the policies a predictor plays against

use crate::rps::Move;

/// A player facing the predictor.
///
/// Opponents pick a move, then get to see what the predictor played. The
/// predictor never looks inside them.
pub trait Opponent: Send {
    /// Move for the coming round.
    fn next_move(&mut self) -> Move;

    /// See the predictor's move for the round just played.
    fn observe(&mut self, _ai_move: Move) {}

    /// Opponent name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Reseed the internal random number generator, if there is one.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
