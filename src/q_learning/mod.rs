//! Q-learning predictor
//!
//! Temporal difference learning over the last three rounds of play. The
//! action is the predicted opponent move and the predictor plays its counter.
//!
//! ## Update rule
//!
//! | Quantity | Value |
//! |----------|-------|
//! | Learning rate | η = 1 / (1 + N(s,a)), per state-action |
//! | Target | r + γ · max_a' Q(s',a') |
//! | Reward | +1 exact, 0 tie, −1 otherwise |
//! | Exploration | ε ← ε · decay after every update |
//!
//! ## Usage Example
//!
//! ```no_run
//! use rps_predictor::{
//!     opponents::SlightBiasOpponent,
//!     ports::Predictor,
//!     q_learning::{Hyperparameters, QLearningPredictor},
//! };
//!
//! let mut learner = QLearningPredictor::new(Hyperparameters::default().with_seed(42))?;
//! learner.train_against(&mut SlightBiasOpponent::new(), 10_000)?;
//! learner.reset();
//! let ai_move = learner.predict();
//! # Ok::<(), rps_predictor::Error>(())
//! ```

pub mod agent;
pub mod hyperparameters;
pub mod q_table;
pub mod serialization;
pub mod state;

// Public re-exports
pub use agent::{QLearningPredictor, SharedRepository, reward};
pub use hyperparameters::Hyperparameters;
pub use q_table::{ACTIONS, QRow, QTable, StateId};
pub use serialization::{QSnapshot, SavedQLearner, SnapshotKey};
pub use state::{QState, STATE_SPACE, WINDOW};
