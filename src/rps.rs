//! Rock-paper-scissors moves and round rules

pub mod moves;
pub mod rules;

pub use moves::{Move, Round};
pub use rules::{Outcome, counter, counter_symbol, get_result, result_of_symbols};
