//! State representation for the Q-learning predictor

use serde::{Deserialize, Serialize};

use crate::rps::Round;

/// Number of past rounds that make up a state.
pub const WINDOW: usize = 3;

/// Number of distinct states: every 3-round window plus [`QState::Unseeded`].
pub const STATE_SPACE: usize = 9 * 9 * 9 + 1;

/// What the Q-learner conditions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QState {
    /// Fewer than [`WINDOW`] rounds have been played
    Unseeded,
    /// The last [`WINDOW`] rounds, oldest first
    Windowed([Round; WINDOW]),
}

impl QState {
    /// State after the given rounds (oldest first).
    pub fn from_rounds(rounds: &[Round]) -> Self {
        match rounds.len().checked_sub(WINDOW) {
            Some(start) => {
                let mut window = [rounds[start]; WINDOW];
                window.copy_from_slice(&rounds[start..]);
                QState::Windowed(window)
            }
            None => QState::Unseeded,
        }
    }

    /// Dense code in `0..STATE_SPACE`; windows are packed base 9.
    pub fn code(&self) -> usize {
        match self {
            QState::Unseeded => STATE_SPACE - 1,
            QState::Windowed(window) => window.iter().fold(0, |acc, round| acc * 9 + round.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::Move;

    fn round(opponent: Move, ai: Move) -> Round {
        Round::new(opponent, ai)
    }

    #[test]
    fn short_history_is_unseeded() {
        assert_eq!(QState::from_rounds(&[]), QState::Unseeded);
        let rounds = [round(Move::Rock, Move::Paper), round(Move::Paper, Move::Paper)];
        assert_eq!(QState::from_rounds(&rounds), QState::Unseeded);
    }

    #[test]
    fn window_keeps_the_last_three_rounds() {
        let rounds = [
            round(Move::Rock, Move::Rock),
            round(Move::Paper, Move::Scissors),
            round(Move::Scissors, Move::Rock),
            round(Move::Rock, Move::Paper),
        ];
        assert_eq!(
            QState::from_rounds(&rounds),
            QState::Windowed([rounds[1], rounds[2], rounds[3]])
        );
    }

    #[test]
    fn codes_stay_in_range() {
        let last = round(Move::Scissors, Move::Scissors);
        assert_eq!(QState::Windowed([last; WINDOW]).code(), STATE_SPACE - 2);
        assert_eq!(QState::Unseeded.code(), STATE_SPACE - 1);
        let first = round(Move::Rock, Move::Rock);
        assert_eq!(QState::Windowed([first; WINDOW]).code(), 0);
    }
}
