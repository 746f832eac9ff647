//! Observer implementations for training and simulation runs
//!
//! Observers allow composable data collection without coupling the round loop
//! to specific output formats.

use std::{collections::VecDeque, fs::File, io::Write, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::round::{RoundRecord, Tally};
use crate::{
    Error, Result,
    ports::Observer,
    predictors::PredictorStats,
    rps::Outcome,
};

/// Progress bar observer - Shows session progress with the running score
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            tally: Tally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} L:{} T:{}",
            self.tally.wins, self.tally.losses, self.tally.ties
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, total_rounds: usize) -> Result<()> {
        let pb = ProgressBar::new(total_rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds (W:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.tally = Tally::default();
        Ok(())
    }

    fn on_round(&mut self, record: &RoundRecord) -> Result<()> {
        self.tally.add(record.outcome);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(record.round as u64);
            // Throttle message redraws
            if record.round % 100 == 0 {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks running totals and a rolling win rate
///
/// The rolling rate counts wins over the last `window` rounds, ties and losses
/// included in the denominator, so it shows how quickly a predictor locks on.
pub struct MetricsObserver {
    tally: Tally,
    window: usize,
    recent: VecDeque<Outcome>,
    recent_wins: usize,
    rolling: Vec<f64>,
}

impl MetricsObserver {
    pub const DEFAULT_WINDOW: usize = 100;

    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    /// Use a rolling window of `window` rounds (at least one).
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            tally: Tally::default(),
            window,
            recent: VecDeque::with_capacity(window),
            recent_wins: 0,
            rolling: Vec::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Win share of the rounds currently in the window.
    pub fn rolling_win_rate(&self) -> f64 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent_wins as f64 / self.recent.len() as f64
        }
    }

    /// Rolling win rate after every round so far.
    pub fn rolling_history(&self) -> &[f64] {
        &self.rolling
    }

    pub fn stats(&self) -> PredictorStats {
        self.tally.stats()
    }

    pub fn summary(&self) -> MetricsSummary {
        let stats = self.stats();
        MetricsSummary {
            rounds: self.tally.rounds(),
            wins: stats.wins,
            losses: stats.losses,
            ties: stats.ties,
            ai_win_rate: stats.ai_win_rate,
            player_win_rate: stats.player_win_rate,
            window: self.window,
            rolling_win_rate: self.rolling_win_rate(),
            best_rolling_win_rate: self.rolling.iter().copied().fold(0.0, f64::max),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of session metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub rounds: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub ai_win_rate: f64,
    pub player_win_rate: f64,
    pub window: usize,
    pub rolling_win_rate: f64,
    pub best_rolling_win_rate: f64,
}

impl Observer for MetricsObserver {
    fn on_session_start(&mut self, total_rounds: usize) -> Result<()> {
        self.rolling.reserve(total_rounds);
        Ok(())
    }

    fn on_round(&mut self, record: &RoundRecord) -> Result<()> {
        self.tally.add(record.outcome);

        if self.recent.len() == self.window
            && self.recent.pop_front() == Some(Outcome::Win)
        {
            self.recent_wins -= 1;
        }
        if record.outcome == Outcome::Win {
            self.recent_wins += 1;
        }
        self.recent.push_back(record.outcome);

        self.rolling.push(self.rolling_win_rate());
        Ok(())
    }
}

/// CSV observer - Writes every round as a ledger row
pub struct CsvObserver<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvObserver<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let writer = csv::Writer::from_path(path)?;
        log::debug!("Writing round ledger to {}", path.display());
        Ok(Self { writer })
    }
}

impl<W: Write> CsvObserver<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Io {
            operation: "flush CSV ledger".to_string(),
            source: e.into_error(),
        })
    }
}

impl<W: Write + Send> Observer for CsvObserver<W> {
    fn on_round(&mut self, record: &RoundRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rps::Move;

    fn record(round: usize, outcome: Outcome) -> RoundRecord {
        RoundRecord {
            round,
            ai_move: Move::Paper,
            opponent_move: Move::Rock,
            predicted_move: Move::Rock,
            outcome,
            cum_wins: 0,
            cum_losses: 0,
            cum_ties: 0,
        }
    }

    #[test]
    fn rolling_window_forgets_old_rounds() {
        let mut metrics = MetricsObserver::with_window(2);
        metrics.on_session_start(4).unwrap();
        for (i, outcome) in [Outcome::Win, Outcome::Win, Outcome::Lose, Outcome::Tie]
            .into_iter()
            .enumerate()
        {
            metrics.on_round(&record(i + 1, outcome)).unwrap();
        }

        assert_eq!(metrics.rolling_history(), &[1.0, 1.0, 0.5, 0.0]);
        let summary = metrics.summary();
        assert_eq!(summary.rounds, 4);
        assert_eq!(summary.wins, 2);
        assert!((summary.ai_win_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.best_rolling_win_rate, 1.0);
    }

    #[test]
    fn zero_window_is_clamped() {
        assert_eq!(MetricsObserver::with_window(0).window(), 1);
    }

    #[test]
    fn csv_observer_writes_header_and_rows() {
        let mut csv = CsvObserver::from_writer(Vec::new());
        csv.on_round(&record(1, Outcome::Win)).unwrap();
        csv.on_round(&record(2, Outcome::Tie)).unwrap();
        csv.on_session_end().unwrap();

        let text = String::from_utf8(csv.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "round,ai_move,opponent_move,predicted_move,outcome,cum_wins,cum_losses,cum_ties"
        );
        assert_eq!(lines[1], "1,P,R,R,win,0,0,0");
        assert_eq!(lines[2], "2,P,R,R,tie,0,0,0");
    }
}
