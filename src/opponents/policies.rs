//! Scripted and stochastic opponent policies

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    ports::Opponent,
    predictors::build_rng,
    rps::{Move, counter},
};

fn random_move(rng: &mut StdRng) -> Move {
    *Move::ALL.choose(rng).unwrap_or(&Move::Rock)
}

/// Opponent that plays uniformly at random
#[derive(Debug, Clone)]
pub struct UniformOpponent {
    rng: StdRng,
}

impl UniformOpponent {
    pub fn new() -> Self {
        Self { rng: build_rng(None) }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for UniformOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for UniformOpponent {
    fn next_move(&mut self) -> Move {
        random_move(&mut self.rng)
    }

    fn name(&self) -> &str {
        "Uniform"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent that repeats its previous move with a fixed probability
#[derive(Debug, Clone)]
pub struct RepeaterOpponent {
    repeat_probability: f64,
    last: Option<Move>,
    rng: StdRng,
}

impl RepeaterOpponent {
    pub const DEFAULT_REPEAT_PROBABILITY: f64 = 0.5;

    pub fn new() -> Self {
        Self::with_probability(Self::DEFAULT_REPEAT_PROBABILITY)
    }

    /// Repeat with `repeat_probability`, clamped to `[0, 1]`.
    pub fn with_probability(repeat_probability: f64) -> Self {
        Self {
            repeat_probability: repeat_probability.clamp(0.0, 1.0),
            last: None,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for RepeaterOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RepeaterOpponent {
    fn next_move(&mut self) -> Move {
        let mv = match self.last {
            Some(last) if self.rng.random::<f64>() < self.repeat_probability => last,
            _ => random_move(&mut self.rng),
        };
        self.last = Some(mv);
        mv
    }

    fn name(&self) -> &str {
        "Repeater"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent that plays whatever beats the predictor's previous move
#[derive(Debug, Clone)]
pub struct CounterLastOpponent {
    last_seen: Option<Move>,
    rng: StdRng,
}

impl CounterLastOpponent {
    pub fn new() -> Self {
        Self {
            last_seen: None,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for CounterLastOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for CounterLastOpponent {
    fn next_move(&mut self) -> Move {
        match self.last_seen {
            Some(seen) => counter(seen),
            None => random_move(&mut self.rng),
        }
    }

    fn observe(&mut self, ai_move: Move) {
        self.last_seen = Some(ai_move);
    }

    fn name(&self) -> &str {
        "Counter"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent following the FizzBuzz pattern over the 1-based round number
///
/// Multiples of 15 play Scissors, other multiples of 3 play Rock, other
/// multiples of 5 play Paper, and every remaining round is random.
#[derive(Debug, Clone)]
pub struct FizzBuzzOpponent {
    round: u64,
    rng: StdRng,
}

impl FizzBuzzOpponent {
    pub fn new() -> Self {
        Self {
            round: 0,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for FizzBuzzOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for FizzBuzzOpponent {
    fn next_move(&mut self) -> Move {
        self.round += 1;
        match (self.round % 3, self.round % 5) {
            (0, 0) => Move::Scissors,
            (0, _) => Move::Rock,
            (_, 0) => Move::Paper,
            _ => random_move(&mut self.rng),
        }
    }

    fn name(&self) -> &str {
        "FizzBuzz"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent with a slight preference for Rock
#[derive(Debug, Clone)]
pub struct SlightBiasOpponent {
    rng: StdRng,
}

impl SlightBiasOpponent {
    pub const ROCK_PROBABILITY: f64 = 0.35;

    pub fn new() -> Self {
        Self { rng: build_rng(None) }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl Default for SlightBiasOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for SlightBiasOpponent {
    fn next_move(&mut self) -> Move {
        if self.rng.random::<f64>() < Self::ROCK_PROBABILITY {
            Move::Rock
        } else if self.rng.random_bool(0.5) {
            Move::Paper
        } else {
            Move::Scissors
        }
    }

    fn name(&self) -> &str {
        "SlightBias"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Opponent replaying a fixed sequence forever
#[derive(Debug, Clone)]
pub struct CycleOpponent {
    sequence: Vec<Move>,
    position: usize,
}

impl CycleOpponent {
    /// Cycle through `sequence`; an empty sequence plays Rock forever.
    pub fn new(sequence: Vec<Move>) -> Self {
        let sequence = if sequence.is_empty() {
            vec![Move::Rock]
        } else {
            sequence
        };
        Self {
            sequence,
            position: 0,
        }
    }

    /// The R, P, S cycle.
    pub fn rps() -> Self {
        Self::new(Move::ALL.to_vec())
    }

    pub fn sequence(&self) -> &[Move] {
        &self.sequence
    }
}

impl Opponent for CycleOpponent {
    fn next_move(&mut self) -> Move {
        let mv = self.sequence[self.position];
        self.position = (self.position + 1) % self.sequence.len();
        mv
    }

    fn name(&self) -> &str {
        "Cycle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::Move::{Paper as P, Rock as R, Scissors as S};

    fn draw(opponent: &mut dyn Opponent, n: usize) -> Vec<Move> {
        (0..n).map(|_| opponent.next_move()).collect()
    }

    #[test]
    fn cycle_repeats_its_sequence() {
        let mut cycle = CycleOpponent::rps();
        assert_eq!(draw(&mut cycle, 7), vec![R, P, S, R, P, S, R]);
        assert_eq!(draw(&mut CycleOpponent::new(vec![]), 2), vec![R, R]);
    }

    #[test]
    fn fizzbuzz_fixed_rounds() {
        let mut fizz = FizzBuzzOpponent::new().with_seed(1);
        let moves = draw(&mut fizz, 15);
        assert_eq!(moves[2], R);
        assert_eq!(moves[4], P);
        assert_eq!(moves[5], R);
        assert_eq!(moves[9], P);
        assert_eq!(moves[14], S);
    }

    #[test]
    fn counter_last_beats_previous_ai_move() {
        let mut opponent = CounterLastOpponent::new().with_seed(2);
        opponent.next_move();
        opponent.observe(R);
        assert_eq!(opponent.next_move(), P);
        opponent.observe(S);
        assert_eq!(opponent.next_move(), R);
    }

    #[test]
    fn repeater_extremes() {
        let mut always = RepeaterOpponent::with_probability(1.0).with_seed(3);
        let moves = draw(&mut always, 20);
        assert!(moves.iter().all(|&mv| mv == moves[0]));
    }

    #[test]
    fn slight_bias_prefers_rock() {
        let mut biased = SlightBiasOpponent::new().with_seed(4);
        let moves = draw(&mut biased, 30_000);
        let share = |target: Move| {
            moves.iter().filter(|&&mv| mv == target).count() as f64 / moves.len() as f64
        };
        assert!((share(R) - 0.35).abs() < 0.02);
        assert!((share(P) - 0.325).abs() < 0.02);
        assert!((share(S) - 0.325).abs() < 0.02);
    }

    #[test]
    fn seeded_opponents_are_reproducible() {
        let mut a = UniformOpponent::new().with_seed(9);
        let mut b = UniformOpponent::new();
        b.set_rng_seed(9);
        assert_eq!(draw(&mut a, 50), draw(&mut b, 50));
    }
}
