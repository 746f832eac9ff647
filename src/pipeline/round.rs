//! A single round between a predictor and an opponent

use serde::{Deserialize, Serialize};

use crate::{
    ports::{Opponent, Predictor},
    predictors::PredictorStats,
    rps::{Move, Outcome},
};

/// One ledger row.
///
/// Field names and values form the CSV export format: `outcome` is
/// `win|lose|tie` from the predictor's side and `predicted_move` is the
/// guess about the opponent, not the move that was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index
    pub round: usize,
    pub ai_move: Move,
    pub opponent_move: Move,
    pub predicted_move: Move,
    pub outcome: Outcome,
    pub cum_wins: usize,
    pub cum_losses: usize,
    pub cum_ties: usize,
}

/// Running totals for one session, independent of the predictor's record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn rounds(&self) -> usize {
        self.wins + self.losses + self.ties
    }

    pub fn stats(&self) -> PredictorStats {
        PredictorStats::new(self.wins, self.losses, self.ties)
    }
}

/// Play one round: forecast, let the opponent move, show it the answer, then
/// update the predictor.
pub fn play_round(
    predictor: &mut dyn Predictor,
    opponent: &mut dyn Opponent,
    tally: &mut Tally,
) -> RoundRecord {
    let prediction = predictor.forecast();
    let opponent_move = opponent.next_move();
    opponent.observe(prediction.play);
    predictor.update(opponent_move, prediction.play);

    let outcome = crate::rps::get_result(opponent_move, prediction.play);
    tally.add(outcome);

    RoundRecord {
        round: tally.rounds(),
        ai_move: prediction.play,
        opponent_move,
        predicted_move: prediction.expected,
        outcome,
        cum_wins: tally.wins,
        cum_losses: tally.losses,
        cum_ties: tally.ties,
    }
}
