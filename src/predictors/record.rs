//! Running history and score kept by every predictor

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rps::{Move, Outcome, Round, get_result};

/// Snapshot of a predictor's score.
///
/// Rates only consider decisive games: ties say nothing about prediction
/// quality, so they are left out of the denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorStats {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub total_games: usize,
    pub ai_win_rate: f64,
    pub player_win_rate: f64,
}

impl PredictorStats {
    pub fn new(wins: usize, losses: usize, ties: usize) -> Self {
        let decisive = wins + losses;
        let (ai_win_rate, player_win_rate) = if decisive > 0 {
            (
                wins as f64 / decisive as f64,
                losses as f64 / decisive as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            wins,
            losses,
            ties,
            total_games: wins + losses + ties,
            ai_win_rate,
            player_win_rate,
        }
    }

    pub fn ai_win_rate_percent(&self) -> String {
        format!("{:.1}%", self.ai_win_rate * 100.0)
    }

    pub fn player_win_rate_percent(&self) -> String {
        format!("{:.1}%", self.player_win_rate * 100.0)
    }
}

impl fmt::Display for PredictorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games={}, W-L-T={}-{}-{}",
            self.total_games, self.wins, self.losses, self.ties
        )
    }
}

/// Append-only log of completed rounds plus the score derived from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    rounds: Vec<Round>,
    wins: usize,
    losses: usize,
    ties: usize,
}

impl MatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a round and bump the matching score counter.
    pub fn record(&mut self, opponent_move: Move, ai_move: Move) -> Outcome {
        self.rounds.push(Round::new(opponent_move, ai_move));
        let outcome = get_result(opponent_move, ai_move);
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
        outcome
    }

    /// Completed rounds, oldest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The opponent's moves, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = Move> + ExactSizeIterator + '_ {
        self.rounds.iter().map(|round| round.opponent)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn stats(&self) -> PredictorStats {
        PredictorStats::new(self.wins, self.losses, self.ties)
    }

    pub fn clear(&mut self) {
        self.rounds.clear();
        self.wins = 0;
        self.losses = 0;
        self.ties = 0;
    }
}
