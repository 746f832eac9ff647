//! Training and simulation pipelines
//!
//! This module provides:
//! - The single-round primitive shared by every driver
//! - Training a Q-learner against an opponent
//! - Batch simulation with a per-round ledger
//! - Observers recording progress and metrics along the way

pub mod observers;
pub mod round;
pub mod simulation;
pub mod training;

pub use observers::{CsvObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use round::{RoundRecord, Tally, play_round};
pub use simulation::{
    Simulation, SimulationConfig, SimulationResult, SimulationSummary, read_ledger, write_ledger,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
