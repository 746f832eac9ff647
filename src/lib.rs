//! Rock/paper/scissors prediction engine
//!
//! This crate provides:
//! - Game rules over a typed [`rps::Move`]
//! - Random, order-k Markov and Q-learning predictors behind one
//!   [`ports::Predictor`] contract
//! - Scripted opponents, batch simulation with a CSV ledger, and training
//! - Q-table snapshots persisted as MessagePack behind a JSON manifest
//! - An interactive session driver and the `rps` command-line tool

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod opponents;
pub mod pipeline;
pub mod ports;
pub mod predictors;
pub mod q_learning;
pub mod rps;
pub mod session;

pub use error::{Error, Result};
pub use ports::{Opponent, Predictor};
pub use rps::{Move, Outcome, counter, get_result};
