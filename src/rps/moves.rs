//! The three moves and the record of a single round

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the three symbols of the game.
///
/// The discriminants give the canonical ordering `R < P < S`, which is also
/// the tie-break order used by every predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    #[serde(rename = "R")]
    Rock = 0,
    #[serde(rename = "P")]
    Paper = 1,
    #[serde(rename = "S")]
    Scissors = 2,
}

impl Move {
    /// All moves in canonical order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Position of the move in [`Move::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Move::index`].
    pub fn from_index(index: usize) -> Option<Move> {
        Move::ALL.get(index).copied()
    }

    /// Single-letter symbol (`R`, `P` or `S`).
    pub const fn symbol(self) -> char {
        match self {
            Move::Rock => 'R',
            Move::Paper => 'P',
            Move::Scissors => 'S',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Move {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol.to_ascii_uppercase() {
            'R' => Ok(Move::Rock),
            'P' => Ok(Move::Paper),
            'S' => Ok(Move::Scissors),
            _ => Err(Error::InvalidMove {
                symbol: symbol.to_string(),
            }),
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Accepts the single-letter symbols and the full names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Ok(Move::Rock),
            "p" | "paper" => Ok(Move::Paper),
            "s" | "scissors" => Ok(Move::Scissors),
            _ => Err(Error::InvalidMove {
                symbol: s.to_string(),
            }),
        }
    }
}

/// A completed round: what the opponent played and what the predictor answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Round {
    pub opponent: Move,
    pub ai: Move,
}

impl Round {
    pub fn new(opponent: Move, ai: Move) -> Self {
        Self { opponent, ai }
    }

    /// Dense encoding in `0..9`, opponent move major.
    pub const fn code(self) -> usize {
        self.opponent.index() * 3 + self.ai.index()
    }
}
