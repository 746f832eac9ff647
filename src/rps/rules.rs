//! Cyclic dominance and round outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

use super::moves::Move;
use crate::Result;

/// Result of a round, always from the predictor's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Tie => "tie",
        }
    }

    /// Whether the round counts towards decisive-game rates.
    pub const fn is_decisive(self) -> bool {
        !matches!(self, Outcome::Tie)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unique move that defeats `mv`.
pub const fn counter(mv: Move) -> Move {
    match mv {
        Move::Rock => Move::Paper,
        Move::Paper => Move::Scissors,
        Move::Scissors => Move::Rock,
    }
}

/// Outcome for the AI when the player plays `player` and the AI plays `ai`.
pub fn get_result(player: Move, ai: Move) -> Outcome {
    if player == ai {
        Outcome::Tie
    } else if counter(player) == ai {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// [`counter`] over raw symbols.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidMove`] for anything outside `R`, `P`, `S`.
pub fn counter_symbol(symbol: &str) -> Result<Move> {
    Ok(counter(symbol.parse()?))
}

/// [`get_result`] over raw symbols.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidMove`] if either symbol is invalid.
pub fn result_of_symbols(player: &str, ai: &str) -> Result<Outcome> {
    Ok(get_result(player.parse()?, ai.parse()?))
}
