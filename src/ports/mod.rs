//! Ports (trait boundaries) between the prediction core and its collaborators.
//!
//! Predictors, opponents, observers and snapshot stores are all reached
//! through these traits; concrete implementations live in `predictors`,
//! `opponents`, `pipeline` and `adapters`.

pub mod observer;
pub mod opponent;
pub mod predictor;
pub mod repository;

pub use observer::Observer;
pub use opponent::Opponent;
pub use predictor::{Prediction, Predictor};
pub use repository::SnapshotRepository;
