//! Higher-order Markov chain over the opponent's moves
//!
//! The last `k` opponent moves form the state. For every state the predictor
//! counts which move followed it, and answers the most frequent successor.
//! Unseen or thinly observed states fall back to global move frequencies and
//! finally to a random guess.

use std::collections::HashMap;

use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{build_rng, record::MatchRecord};
use crate::{
    Error, Result,
    ports::{Prediction, Predictor},
    rps::Move,
};

/// A state needs at least this many observed successors before it is trusted.
pub const MIN_STATE_OBSERVATIONS: u32 = 2;

/// The global frequency fallback needs at least this many observed moves.
pub const MIN_FREQUENCY_SAMPLES: u32 = 5;

/// Largest order whose base-3 packed window still fits in a `u64`.
pub const MAX_ORDER: usize = 40;

pub const DEFAULT_ORDER: usize = 3;

/// Fixed-width key for a window of `k` moves, packed base 3 oldest-first.
///
/// Windows of one table all share the same length, so packing is injective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowKey(u64);

impl WindowKey {
    pub fn pack<I>(window: I) -> Self
    where
        I: IntoIterator<Item = Move>,
    {
        WindowKey(
            window
                .into_iter()
                .fold(0u64, |acc, mv| acc * 3 + mv.index() as u64),
        )
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Successor counts per window. Entries are only ever added or incremented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionTable {
    counts: HashMap<WindowKey, [u32; 3]>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: WindowKey, next: Move) {
        self.counts.entry(key).or_insert([0; 3])[next.index()] += 1;
    }

    pub fn get(&self, key: WindowKey) -> Option<&[u32; 3]> {
        self.counts.get(&key)
    }

    /// Number of distinct windows seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Most frequent move; ties go to the earliest move in canonical order.
fn most_frequent(counts: &[u32; 3]) -> Move {
    let mut best = 0;
    for (idx, &count) in counts.iter().enumerate().skip(1) {
        if count > counts[best] {
            best = idx;
        }
    }
    Move::ALL[best]
}

/// Order-k Markov chain predictor.
#[derive(Debug, Clone)]
pub struct MarkovPredictor {
    order: usize,
    transitions: TransitionTable,
    frequency: [u32; 3],
    record: MatchRecord,
    rng: StdRng,
}

impl MarkovPredictor {
    /// Create a predictor conditioning on the last `order` opponent moves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `1 <= order <= MAX_ORDER`.
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(Error::InvalidConfiguration {
                message: format!("Markov order must be between 1 and {MAX_ORDER}, got {order}"),
            });
        }

        Ok(Self::with_order(order))
    }

    fn with_order(order: usize) -> Self {
        Self {
            order,
            transitions: TransitionTable::new(),
            frequency: [0; 3],
            record: MatchRecord::new(),
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Global counts of the opponent's moves, indexed by [`Move::index`].
    pub fn frequency(&self) -> [u32; 3] {
        self.frequency
    }

    /// Successor counts for an explicit window, oldest move first.
    ///
    /// Returns `None` when the window has the wrong length or was never seen.
    pub fn transition_counts(&self, window: &[Move]) -> Option<[u32; 3]> {
        if window.len() != self.order {
            return None;
        }
        self.transitions
            .get(WindowKey::pack(window.iter().copied()))
            .copied()
    }

    /// Key for the most recent `order` opponent moves, if there are enough.
    fn current_key(&self) -> Option<WindowKey> {
        let len = self.record.len();
        if len < self.order {
            return None;
        }
        Some(WindowKey::pack(self.record.history().skip(len - self.order)))
    }

    fn pattern_guess(&self) -> Option<Move> {
        let counts = self.transitions.get(self.current_key()?)?;
        if counts.iter().sum::<u32>() < MIN_STATE_OBSERVATIONS {
            return None;
        }
        Some(most_frequent(counts))
    }

    fn frequency_guess(&self) -> Option<Move> {
        if self.frequency.iter().sum::<u32>() < MIN_FREQUENCY_SAMPLES {
            return None;
        }
        Some(most_frequent(&self.frequency))
    }

    fn random_guess(&mut self) -> Move {
        Move::ALL[self.rng.random_range(0..Move::ALL.len())]
    }
}

impl Default for MarkovPredictor {
    fn default() -> Self {
        Self::with_order(DEFAULT_ORDER)
    }
}

impl Predictor for MarkovPredictor {
    fn forecast(&mut self) -> Prediction {
        let expected = match self.pattern_guess() {
            Some(mv) => mv,
            None => match self.frequency_guess() {
                Some(mv) => {
                    trace!("Markov state untrusted, using global frequency");
                    mv
                }
                None => self.random_guess(),
            },
        };
        Prediction::expecting(expected)
    }

    fn update(&mut self, opponent_move: Move, ai_move: Move) {
        self.record.record(opponent_move, ai_move);
        self.frequency[opponent_move.index()] += 1;

        let len = self.record.len();
        if len > self.order {
            let preceding = &self.record.rounds()[len - 1 - self.order..len - 1];
            let key = WindowKey::pack(preceding.iter().map(|round| round.opponent));
            self.transitions.observe(key, opponent_move);
        }
    }

    fn record(&self) -> &MatchRecord {
        &self.record
    }

    /// Forget the match and the move frequencies drawn from it. Transitions
    /// survive.
    fn reset(&mut self) {
        self.record.clear();
        self.frequency = [0; 3];
    }

    fn full_reset(&mut self) {
        self.record.clear();
        self.transitions.clear();
        self.frequency = [0; 3];
    }

    fn name(&self) -> &str {
        "Markov"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::{
        Move::{Paper as P, Rock as R, Scissors as S},
        counter,
    };

    fn feed(predictor: &mut MarkovPredictor, moves: &[Move]) {
        for &mv in moves {
            let ai = predictor.predict();
            predictor.update(mv, ai);
        }
    }

    #[test]
    fn rejects_zero_and_oversized_orders() {
        assert!(MarkovPredictor::new(0).is_err());
        assert!(MarkovPredictor::new(MAX_ORDER + 1).is_err());
        assert!(MarkovPredictor::new(MAX_ORDER).is_ok());
    }

    #[test]
    fn packed_keys_distinguish_order() {
        assert_ne!(WindowKey::pack([R, P]), WindowKey::pack([P, R]));
        assert_eq!(WindowKey::pack([S, S]).value(), 8);
    }

    #[test]
    fn learns_transition_counts() {
        let mut predictor = MarkovPredictor::new(2).unwrap().with_seed(1);
        feed(&mut predictor, &[R, P, P, R, P, P]);

        assert_eq!(predictor.transition_counts(&[R, P]), Some([0, 2, 0]));
        assert_eq!(predictor.transition_counts(&[P, P]), Some([1, 0, 0]));
        assert_eq!(predictor.transition_counts(&[P, R]), Some([0, 1, 0]));
        assert_eq!(predictor.transitions().len(), 3);
        assert_eq!(predictor.frequency(), [2, 4, 0]);
    }

    #[test]
    fn trusted_state_predicts_most_frequent_successor() {
        let mut predictor = MarkovPredictor::new(2).unwrap().with_seed(1);
        feed(&mut predictor, &[R, P, P, R, P, P, R, P]);

        // Current state is (R, P), seen twice followed by P
        let prediction = predictor.forecast();
        assert_eq!(prediction.expected, P);
        assert_eq!(prediction.play, counter(P));
    }

    #[test]
    fn single_observation_is_not_trusted() {
        let mut predictor = MarkovPredictor::new(1).unwrap().with_seed(1);
        // (S) -> R seen once; global frequency has too few samples
        feed(&mut predictor, &[S, R, S]);
        assert_eq!(predictor.transition_counts(&[S]), Some([1, 0, 0]));
        assert!(predictor.pattern_guess().is_none());
        assert!(predictor.frequency_guess().is_none());
    }

    #[test]
    fn frequency_fallback_needs_five_samples() {
        let mut predictor = MarkovPredictor::new(3).unwrap().with_seed(1);
        feed(&mut predictor, &[S, S, S, S]);
        assert!(predictor.frequency_guess().is_none());
        feed(&mut predictor, &[S]);
        assert_eq!(predictor.frequency_guess(), Some(S));
    }

    #[test]
    fn ties_break_in_canonical_order() {
        assert_eq!(most_frequent(&[2, 2, 2]), R);
        assert_eq!(most_frequent(&[0, 3, 3]), P);
        assert_eq!(most_frequent(&[1, 0, 4]), S);
    }

    #[test]
    fn soft_reset_keeps_tables_full_reset_clears_them() {
        let mut predictor = MarkovPredictor::new(1).unwrap().with_seed(4);
        feed(&mut predictor, &[R, P, R, P]);

        predictor.reset();
        assert!(predictor.record().is_empty());
        assert!(!predictor.transitions().is_empty());
        assert_eq!(predictor.frequency(), [0, 0, 0]);

        predictor.full_reset();
        assert!(predictor.transitions().is_empty());
        assert_eq!(predictor.frequency(), [0, 0, 0]);
    }

    #[test]
    fn soft_reset_guesses_randomly() {
        let mut predictor = MarkovPredictor::new(3).unwrap().with_seed(8);
        feed(&mut predictor, &[R; 12]);
        assert_eq!(predictor.forecast().expected, R);

        predictor.reset();
        assert!(predictor.frequency_guess().is_none());
        let guesses: std::collections::HashSet<Move> =
            (0..60).map(|_| predictor.forecast().expected).collect();
        assert_eq!(guesses.len(), 3);
    }

    #[test]
    fn default_uses_default_order() {
        let predictor = MarkovPredictor::default();
        assert_eq!(predictor.order(), DEFAULT_ORDER);
        assert!(predictor.transitions().is_empty());
    }
}
