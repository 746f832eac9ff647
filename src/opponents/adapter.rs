//! Lets a predictor take the opponent's seat

use crate::{
    ports::{Opponent, Predictor},
    rps::Move,
};

/// Wraps a [`Predictor`] so it can play as an [`Opponent`].
///
/// From the wrapped predictor's side the roles are swapped: the move it is
/// shown through [`Opponent::observe`] is its opponent's move.
#[derive(Debug, Clone)]
pub struct PredictorOpponent<P> {
    predictor: P,
    name: String,
    pending: Option<Move>,
}

impl<P: Predictor> PredictorOpponent<P> {
    pub fn new(predictor: P) -> Self {
        let name = format!("{}Player", predictor.name().replace('-', ""));
        Self {
            predictor,
            name,
            pending: None,
        }
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn into_inner(self) -> P {
        self.predictor
    }
}

impl<P: Predictor> Opponent for PredictorOpponent<P> {
    fn next_move(&mut self) -> Move {
        let mv = self.predictor.predict();
        self.pending = Some(mv);
        mv
    }

    fn observe(&mut self, ai_move: Move) {
        if let Some(own) = self.pending.take() {
            self.predictor.update(ai_move, own);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.predictor.set_rng_seed(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        opponents::CycleOpponent,
        pipeline::{Tally, play_round},
        predictors::{MarkovPredictor, RandomPredictor},
    };

    #[test]
    fn wrapped_predictor_sees_the_other_side() {
        let mut opponent = PredictorOpponent::new(RandomPredictor::new().with_seed(1));
        let mut ai = MarkovPredictor::default().with_seed(2);
        let mut tally = Tally::default();

        let record = play_round(&mut ai, &mut opponent, &mut tally);
        let inner = opponent.predictor().record();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.rounds()[0].opponent, record.ai_move);
        assert_eq!(inner.rounds()[0].ai, record.opponent_move);
    }

    #[test]
    fn observe_without_move_is_ignored() {
        let mut opponent = PredictorOpponent::new(RandomPredictor::new());
        opponent.observe(Move::Rock);
        assert!(opponent.predictor().record().is_empty());
    }

    #[test]
    fn markov_player_exploits_a_cycle() {
        // The cycle plays the predictor's side; the Markov player learns it
        let mut markov = PredictorOpponent::new(MarkovPredictor::default().with_seed(5));
        let mut cycle = CycleOpponent::rps();
        for _ in 0..60 {
            let seen = cycle.next_move();
            markov.next_move();
            markov.observe(seen);
        }
        let stats = markov.predictor().stats();
        assert!(stats.wins > 40, "{stats:?}");
        assert_eq!(markov.name(), "MarkovPlayer");
    }
}
