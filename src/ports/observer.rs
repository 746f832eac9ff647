//! Observer port - abstraction for watching training and simulation runs
//!
//! Observers collect data round by round without coupling the drivers to a
//! particular output format.

use crate::{Result, pipeline::RoundRecord};

/// Observer trait for monitoring sessions
///
/// The methods are called in this order:
/// 1. `on_session_start(total_rounds)` - once
/// 2. `on_round(record)` - after every completed round
/// 3. `on_session_end()` - once
///
/// # Examples
///
/// ```no_run
/// use rps_predictor::{pipeline::RoundRecord, ports::Observer, rps::Outcome};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_round(&mut self, record: &RoundRecord) -> rps_predictor::Result<()> {
///         if record.outcome == Outcome::Win {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called before the first round.
    ///
    /// # Parameters
    ///
    /// * `total_rounds` - Number of rounds that will be played
    fn on_session_start(&mut self, _total_rounds: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each round has been recorded by the predictor.
    fn on_round(&mut self, _record: &RoundRecord) -> Result<()> {
        Ok(())
    }

    /// Called after the last round. Flush files or print summaries here.
    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
