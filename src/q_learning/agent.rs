//! Q-learning predictor
//!
//! Treats "which move will the opponent play next" as the action, learns a
//! value per action for every 3-round window, and plays the counter of the
//! chosen action.

use std::{fmt, sync::Arc};

use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    hyperparameters::Hyperparameters,
    q_table::{ACTIONS, QTable, StateId},
    serialization::{QSnapshot, SnapshotKey},
    state::QState,
};
use crate::{
    Error, Result,
    pipeline::{RoundRecord, Tally, TrainingResult, play_round},
    ports::{Observer, Opponent, Prediction, Predictor, SnapshotRepository},
    predictors::{build_rng, record::MatchRecord},
    rps::{Move, counter},
};

/// Shared handle to a snapshot store.
pub type SharedRepository = Arc<dyn SnapshotRepository + Send + Sync>;

/// Reward for predicting `predicted` when the opponent played `actual`.
///
/// +1 for an exact prediction, 0 for the near miss where the opponent played
/// the counter of the prediction (a tie), −1 otherwise.
pub fn reward(predicted: Move, actual: Move) -> f64 {
    if predicted == actual {
        1.0
    } else if counter(predicted) == actual {
        0.0
    } else {
        -1.0
    }
}

/// State-action chosen by the last forecast, consumed by the next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAction {
    state: StateId,
    action: usize,
}

/// Tabular Q-learning predictor with ε-greedy exploration.
#[derive(Clone)]
pub struct QLearningPredictor {
    table: QTable,
    params: Hyperparameters,
    epsilon: f64,
    episodes: u64,
    pending: Option<PendingAction>,
    trained: bool,
    record: MatchRecord,
    rng: StdRng,
    repository: Option<SharedRepository>,
}

impl QLearningPredictor {
    /// Create an untrained predictor without persistence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a rate lies outside `[0, 1]`.
    pub fn new(params: Hyperparameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            table: QTable::new(),
            params,
            epsilon: params.epsilon,
            episodes: 0,
            pending: None,
            trained: false,
            record: MatchRecord::new(),
            rng: build_rng(params.seed),
            repository: None,
        })
    }

    /// Create a predictor backed by a snapshot store.
    ///
    /// The most trained snapshot matching the discount factor and decay rate
    /// is loaded if there is one. A missing or unreadable snapshot is logged
    /// and the predictor starts from empty tables.
    ///
    /// # Errors
    ///
    /// Only invalid hyperparameters are an error.
    pub fn open(params: Hyperparameters, repository: SharedRepository) -> Result<Self> {
        let mut predictor = Self::new(params)?;
        let key = predictor.snapshot_key();

        match repository.load_latest(key) {
            Ok(Some(snapshot)) => predictor.apply_snapshot(snapshot),
            Ok(None) => debug!("No Q-table snapshot stored for {key}"),
            Err(err) => warn!("Failed to load Q-table snapshot for {key}: {err}; starting fresh"),
        }

        predictor.repository = Some(repository);
        Ok(predictor)
    }

    /// Create a predictor from an already loaded snapshot.
    pub fn from_snapshot(params: Hyperparameters, snapshot: QSnapshot) -> Result<Self> {
        let mut predictor = Self::new(params)?;
        predictor.apply_snapshot(snapshot);
        Ok(predictor)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn apply_snapshot(&mut self, snapshot: QSnapshot) {
        if snapshot.key() != self.snapshot_key() {
            warn!(
                "Snapshot filed under {} loaded into predictor keyed {}",
                snapshot.key(),
                self.snapshot_key()
            );
        }

        if (0.0..=1.0).contains(&snapshot.epsilon) {
            self.epsilon = snapshot.epsilon;
        } else {
            warn!(
                "Ignoring out-of-range snapshot epsilon {}; keeping {}",
                snapshot.epsilon, self.epsilon
            );
        }

        info!(
            "Loaded Q-table snapshot: {} episodes, epsilon {:.4}, {} states",
            snapshot.episodes,
            self.epsilon,
            snapshot.q_table.len()
        );

        self.table = snapshot.q_table;
        self.episodes = snapshot.episodes;
        self.trained = true;
    }

    pub fn snapshot_key(&self) -> SnapshotKey {
        SnapshotKey::new(self.params.discount_factor, self.params.decay_rate)
    }

    /// Copy of the learned state, ready to be stored.
    pub fn snapshot(&self) -> QSnapshot {
        QSnapshot {
            q_table: self.table.clone(),
            episodes: self.episodes,
            discount_factor: self.params.discount_factor,
            epsilon: self.epsilon,
            decay_rate: self.params.decay_rate,
        }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of learning updates applied so far, including loaded ones.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    /// State the next forecast will condition on.
    pub fn current_state(&self) -> QState {
        QState::from_rounds(self.record.rounds())
    }

    pub fn has_pending_action(&self) -> bool {
        self.pending.is_some()
    }

    /// Explicitly set the exploration rate, e.g. to 0 for pure exploitation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `epsilon` is in `[0, 1]`.
    pub fn reset_exploration(&mut self, epsilon: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be within [0, 1], got {epsilon}"),
            });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    /// Train against `opponent` for `episodes` rounds, then save a snapshot.
    ///
    /// Returns `Ok(None)` without playing if this instance is already
    /// trained, either by an earlier call or by a loaded snapshot.
    pub fn train_against(
        &mut self,
        opponent: &mut dyn Opponent,
        episodes: usize,
    ) -> Result<Option<TrainingResult>> {
        self.train_observed(opponent, episodes, &mut [])
    }

    /// [`QLearningPredictor::train_against`] with observers notified of every
    /// round.
    ///
    /// An observer error ends the run early. The learner then counts as
    /// trained and keeps what it learned, but no snapshot is saved.
    pub fn train_observed(
        &mut self,
        opponent: &mut dyn Opponent,
        episodes: usize,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<Option<TrainingResult>> {
        if self.trained {
            debug!("Q-learner already trained; skipping {episodes} episodes");
            return Ok(None);
        }

        info!(
            "Training for {episodes} episodes against {} (initial epsilon {:.4})",
            opponent.name(),
            self.epsilon
        );

        let played = self.play_episodes(opponent, episodes, observers);
        // A run cut short by an observer has still changed the table
        self.trained = true;
        let tally = match played {
            Ok(tally) => tally,
            Err(err) => {
                warn!("Training stopped early, snapshot not saved: {err}");
                return Err(err);
            }
        };
        let snapshot_saved = self.persist();

        Ok(Some(TrainingResult {
            episodes,
            opponent: opponent.name().to_string(),
            stats: tally.stats(),
            final_epsilon: self.epsilon,
            states_learned: self.table.len(),
            snapshot_saved,
        }))
    }

    fn play_episodes(
        &mut self,
        opponent: &mut dyn Opponent,
        episodes: usize,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<Tally> {
        for observer in observers.iter_mut() {
            observer.on_session_start(episodes)?;
        }

        let mut tally = Tally::default();
        for _ in 0..episodes {
            let record: RoundRecord = play_round(self, opponent, &mut tally);
            for observer in observers.iter_mut() {
                observer.on_round(&record)?;
            }
        }

        for observer in observers.iter_mut() {
            observer.on_session_end()?;
        }
        Ok(tally)
    }

    /// Save a snapshot if a store is attached. Failures are logged only.
    fn persist(&self) -> bool {
        let Some(repository) = &self.repository else {
            return false;
        };

        let snapshot = self.snapshot();
        match repository.save(&snapshot) {
            Ok(()) => {
                info!("Saved Q-table snapshot {}", snapshot.file_name());
                true
            }
            Err(err) => {
                warn!("Failed to save Q-table snapshot: {err}");
                false
            }
        }
    }
}

impl fmt::Debug for QLearningPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QLearningPredictor")
            .field("params", &self.params)
            .field("epsilon", &self.epsilon)
            .field("episodes", &self.episodes)
            .field("states", &self.table.len())
            .field("trained", &self.trained)
            .field("persistent", &self.repository.is_some())
            .finish_non_exhaustive()
    }
}

impl Predictor for QLearningPredictor {
    fn forecast(&mut self) -> Prediction {
        let state = self.table.ensure(self.current_state());

        let action = if self.rng.random::<f64>() < self.epsilon {
            self.rng.random_range(0..ACTIONS)
        } else {
            self.table.greedy_action(state)
        };

        self.pending = Some(PendingAction { state, action });
        Prediction::expecting(Move::ALL[action])
    }

    fn update(&mut self, opponent_move: Move, ai_move: Move) {
        self.record.record(opponent_move, ai_move);

        let Some(pending) = self.pending.take() else {
            debug!("update without a pending prediction; learning step skipped");
            return;
        };

        let predicted = Move::ALL[pending.action];
        let next_state = self.table.ensure(self.current_state());
        self.table.adaptive_update(
            pending.state,
            pending.action,
            reward(predicted, opponent_move),
            next_state,
            self.params.discount_factor,
        );

        self.episodes += 1;
        self.epsilon = (self.epsilon * self.params.decay_rate).max(0.0);
    }

    fn record(&self) -> &MatchRecord {
        &self.record
    }

    fn reset(&mut self) {
        self.record.clear();
        self.pending = None;
    }

    fn full_reset(&mut self) {
        self.reset();
        self.table.clear();
        self.epsilon = self.params.epsilon;
        self.episodes = 0;
        self.trained = false;
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::InMemoryRepository,
        opponents::{CycleOpponent, SlightBiasOpponent},
        rps::Move::{Paper as P, Rock as R, Scissors as S},
    };

    fn greedy() -> QLearningPredictor {
        QLearningPredictor::new(Hyperparameters::new(0.9, 0.0, 0.99))
            .unwrap()
            .with_seed(1)
    }

    struct FailingRepository;

    impl SnapshotRepository for FailingRepository {
        fn save(&self, _snapshot: &QSnapshot) -> Result<()> {
            Err(Error::Io {
                operation: "write snapshot".to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn load_latest(&self, _key: SnapshotKey) -> Result<Option<QSnapshot>> {
            Ok(None)
        }

        fn episodes(&self, _key: SnapshotKey) -> Result<Vec<u64>> {
            Ok(Vec::new())
        }
    }

    struct FailingObserver {
        fail_at: usize,
    }

    impl Observer for FailingObserver {
        fn on_round(&mut self, record: &RoundRecord) -> Result<()> {
            if record.round == self.fail_at {
                return Err(Error::InvalidConfiguration {
                    message: "observer failed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn corrupt_snapshot_opens_untrained() {
        let repo = Arc::new(InMemoryRepository::new());
        let params = Hyperparameters::default().with_seed(7);
        repo.insert_raw(SnapshotKey::new(0.9, 0.999), 500, b"garbage".to_vec());

        let learner = QLearningPredictor::open(params, repo).unwrap();
        assert!(!learner.is_trained());
        assert!(learner.q_table().is_empty());
        assert_eq!(learner.episodes(), 0);
        assert_eq!(learner.epsilon(), params.epsilon);
    }

    #[test]
    fn failed_save_keeps_learned_state() {
        let params = Hyperparameters::new(0.9, 1.0, 0.99).with_seed(8);
        let mut learner = QLearningPredictor::open(params, Arc::new(FailingRepository)).unwrap();

        let result = learner
            .train_against(&mut SlightBiasOpponent::new().with_seed(9), 200)
            .unwrap()
            .unwrap();

        assert!(!result.snapshot_saved);
        assert!(learner.is_trained());
        assert_eq!(learner.episodes(), 200);
        assert!(!learner.q_table().is_empty());
        assert_eq!(result.states_learned, learner.q_table().len());
    }

    #[test]
    fn observer_error_latches_without_saving() {
        let repo = Arc::new(InMemoryRepository::new());
        let params = Hyperparameters::default().with_seed(10);
        let mut learner = QLearningPredictor::open(params, repo.clone()).unwrap();
        let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(FailingObserver { fail_at: 25 })];

        let result = learner.train_observed(
            &mut SlightBiasOpponent::new().with_seed(11),
            100,
            &mut observers,
        );

        assert!(result.is_err());
        assert!(learner.is_trained());
        assert_eq!(learner.episodes(), 25);
        assert_eq!(repo.count(), 0);
        assert!(
            learner
                .train_against(&mut SlightBiasOpponent::new(), 100)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn rewards_follow_prediction_quality() {
        assert_eq!(reward(R, R), 1.0);
        assert_eq!(reward(R, P), 0.0);
        assert_eq!(reward(R, S), -1.0);
    }

    #[test]
    fn forecast_sets_pending_and_update_consumes_it() {
        let mut predictor = greedy();
        let ai = predictor.predict();
        assert!(predictor.has_pending_action());
        assert!(predictor.record().is_empty());

        predictor.update(R, ai);
        assert!(!predictor.has_pending_action());
        assert_eq!(predictor.episodes(), 1);
    }

    #[test]
    fn update_without_forecast_only_records() {
        let mut predictor = greedy();
        predictor.update(R, P);
        predictor.update(S, P);

        assert_eq!(predictor.record().len(), 2);
        assert_eq!(predictor.episodes(), 0);
        assert!(predictor.q_table().is_empty());
    }

    #[test]
    fn double_update_learns_once() {
        let mut predictor = greedy();
        let ai = predictor.predict();
        predictor.update(R, ai);
        let before = predictor.q_table().rows().to_vec();
        predictor.update(R, ai);

        assert_eq!(predictor.episodes(), 1);
        assert_eq!(predictor.q_table().rows()[0], before[0]);
    }

    #[test]
    fn greedy_first_round_predicts_rock() {
        let mut predictor = greedy();
        let prediction = predictor.forecast();
        assert_eq!(prediction.expected, R);
        assert_eq!(prediction.play, P);
    }

    #[test]
    fn correct_prediction_raises_value() {
        let mut predictor = greedy();
        let ai = predictor.predict();
        predictor.update(R, ai);

        let row = predictor.q_table().get(&QState::Unseeded).unwrap();
        // η = 1, reward 1, next state is Unseeded whose max is 0 before the update
        assert!((row.values[0] - 1.0).abs() < 1e-12);
        assert_eq!(row.visits, [1, 0, 0]);
    }

    #[test]
    fn epsilon_decays_multiplicatively() {
        let mut predictor = QLearningPredictor::new(Hyperparameters::new(0.9, 1.0, 0.5))
            .unwrap()
            .with_seed(2);
        for _ in 0..3 {
            let ai = predictor.predict();
            predictor.update(S, ai);
        }
        assert!((predictor.epsilon() - 0.125).abs() < 1e-12);
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        assert!(QLearningPredictor::new(Hyperparameters::new(0.9, 2.0, 0.99)).is_err());
        let mut predictor = greedy();
        assert!(predictor.reset_exploration(-0.5).is_err());
        assert_eq!(predictor.epsilon(), 0.0);
    }

    #[test]
    fn learns_a_deterministic_cycle() {
        let mut predictor = QLearningPredictor::new(Hyperparameters::new(0.9, 1.0, 0.99))
            .unwrap()
            .with_seed(11);
        let mut opponent = CycleOpponent::rps();
        predictor.train_against(&mut opponent, 3000).unwrap();

        predictor.reset();
        let mut tally = Tally::default();
        for _ in 0..300 {
            play_round(&mut predictor, &mut opponent, &mut tally);
        }
        assert!(tally.stats().ai_win_rate > 0.6, "{tally:?}");
    }

    #[test]
    fn training_latches_per_instance() {
        let mut first = greedy();
        let mut second = greedy();
        let mut opponent = SlightBiasOpponent::new().with_seed(3);

        assert!(first.train_against(&mut opponent, 10).unwrap().is_some());
        assert!(first.is_trained());
        assert!(first.train_against(&mut opponent, 10).unwrap().is_none());
        assert_eq!(first.record().len(), 10);

        assert!(!second.is_trained());
        assert!(second.train_against(&mut opponent, 5).unwrap().is_some());
    }

    #[test]
    fn training_saves_and_open_reloads() {
        let repo = Arc::new(InMemoryRepository::new());
        let params = Hyperparameters::new(0.9, 1.0, 0.99).with_seed(5);

        let mut learner = QLearningPredictor::open(params, repo.clone()).unwrap();
        assert!(!learner.is_trained());
        let result = learner
            .train_against(&mut SlightBiasOpponent::new().with_seed(6), 50)
            .unwrap()
            .unwrap();
        assert!(result.snapshot_saved);

        let reloaded = QLearningPredictor::open(params, repo).unwrap();
        assert!(reloaded.is_trained());
        assert_eq!(reloaded.episodes(), 50);
        assert_eq!(reloaded.q_table().len(), learner.q_table().len());
        assert!((reloaded.epsilon() - learner.epsilon()).abs() < 1e-12);
    }

    #[test]
    fn full_reset_forgets_training() {
        let mut predictor = greedy();
        predictor
            .train_against(&mut CycleOpponent::rps(), 20)
            .unwrap();
        predictor.full_reset();

        assert!(!predictor.is_trained());
        assert!(predictor.q_table().is_empty());
        assert_eq!(predictor.episodes(), 0);
        assert!(predictor.record().is_empty());
    }
}
