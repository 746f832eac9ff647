//! Opponent policies used for training, simulation and tests
//!
//! - **Uniform**: uniformly random moves
//! - **Repeater**: repeats its last move half of the time
//! - **Counter**: beats the predictor's previous move
//! - **FizzBuzz**: fixed moves on multiples of 3 and 5, random otherwise
//! - **SlightBias**: Rock 35% of the time
//! - **Cycle**: R, P, S forever
//! - **Markov**: an order-4 Markov predictor playing as the opponent

pub mod adapter;
pub mod policies;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use adapter::PredictorOpponent;
pub use policies::{
    CounterLastOpponent, CycleOpponent, FizzBuzzOpponent, RepeaterOpponent, SlightBiasOpponent,
    UniformOpponent,
};

use crate::{Result, ports::Opponent, predictors::MarkovPredictor};

/// Order of the Markov predictor used as an opponent.
pub const MARKOV_OPPONENT_ORDER: usize = 4;

/// Opponent selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpponentKind {
    #[default]
    Uniform,
    Repeater,
    Counter,
    FizzBuzz,
    SlightBias,
    Cycle,
    Markov,
}

impl OpponentKind {
    pub const ALL: [OpponentKind; 7] = [
        OpponentKind::Uniform,
        OpponentKind::Repeater,
        OpponentKind::Counter,
        OpponentKind::FizzBuzz,
        OpponentKind::SlightBias,
        OpponentKind::Cycle,
        OpponentKind::Markov,
    ];

    /// Creates a boxed opponent, seeded if `seed` is given
    pub fn build(self, seed: Option<u64>) -> Result<Box<dyn Opponent>> {
        let mut opponent: Box<dyn Opponent> = match self {
            OpponentKind::Uniform => Box::new(UniformOpponent::new()),
            OpponentKind::Repeater => Box::new(RepeaterOpponent::new()),
            OpponentKind::Counter => Box::new(CounterLastOpponent::new()),
            OpponentKind::FizzBuzz => Box::new(FizzBuzzOpponent::new()),
            OpponentKind::SlightBias => Box::new(SlightBiasOpponent::new()),
            OpponentKind::Cycle => Box::new(CycleOpponent::rps()),
            OpponentKind::Markov => Box::new(PredictorOpponent::new(MarkovPredictor::new(
                MARKOV_OPPONENT_ORDER,
            )?)),
        };
        if let Some(seed) = seed {
            opponent.set_rng_seed(seed);
        }
        Ok(opponent)
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OpponentKind::Uniform => "uniform",
            OpponentKind::Repeater => "repeater",
            OpponentKind::Counter => "counter",
            OpponentKind::FizzBuzz => "fizz-buzz",
            OpponentKind::SlightBias => "slight-bias",
            OpponentKind::Cycle => "cycle",
            OpponentKind::Markov => "markov",
        };
        f.write_str(label)
    }
}

impl FromStr for OpponentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalised.as_str() {
            "uniform" | "random" => Ok(OpponentKind::Uniform),
            "repeater" => Ok(OpponentKind::Repeater),
            "counter" | "counter-move" => Ok(OpponentKind::Counter),
            "fizz-buzz" | "fizzbuzz" => Ok(OpponentKind::FizzBuzz),
            "slight-bias" | "slightbias" | "bias" => Ok(OpponentKind::SlightBias),
            "cycle" | "rps" => Ok(OpponentKind::Cycle),
            "markov" => Ok(OpponentKind::Markov),
            _ => Err(crate::Error::ParseOpponent {
                input: s.to_string(),
                expected: "uniform, repeater, counter, fizz-buzz, slight-bias, cycle, markov"
                    .to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parses_back() {
        for kind in OpponentKind::ALL {
            assert_eq!(kind.to_string().parse::<OpponentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn aliases_and_errors() {
        assert_eq!("Random".parse::<OpponentKind>().unwrap(), OpponentKind::Uniform);
        assert_eq!(" slight_bias ".parse::<OpponentKind>().unwrap(), OpponentKind::SlightBias);
        assert!(matches!(
            "chaos".parse::<OpponentKind>(),
            Err(crate::Error::ParseOpponent { .. })
        ));
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let mut a = OpponentKind::Repeater.build(Some(7)).unwrap();
        let mut b = OpponentKind::Repeater.build(Some(7)).unwrap();
        let moves_a: Vec<_> = (0..20).map(|_| a.next_move()).collect();
        let moves_b: Vec<_> = (0..20).map(|_| b.next_move()).collect();
        assert_eq!(moves_a, moves_b);
        assert_eq!(OpponentKind::Markov.build(None).unwrap().name(), "MarkovPlayer");
    }
}
