//! Common helpers for the integration test suite.

use rps_predictor::{Move, Predictor};

/// Feed opponent moves through the predict/update cycle.
#[allow(dead_code)]
pub fn feed(predictor: &mut dyn Predictor, moves: &[Move]) {
    for &mv in moves {
        let ai = predictor.predict();
        predictor.update(mv, ai);
    }
}

/// Parse a compact move string such as `"RPPRPP"`.
#[allow(dead_code)]
pub fn moves(symbols: &str) -> Vec<Move> {
    symbols
        .chars()
        .map(|c| Move::try_from(c).unwrap())
        .collect()
}
