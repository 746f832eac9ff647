//! Batch simulation of a predictor against an opponent

use std::{fs::File, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use super::round::{RoundRecord, Tally, play_round};
use crate::{
    Result,
    ports::{Observer, Opponent, Predictor},
};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Rounds to play
    pub rounds: usize,

    /// Random seed for the predictor; the opponent gets `seed + 1`
    pub seed: Option<u64>,

    /// Keep every round in [`SimulationResult::records`]
    pub keep_records: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 1000,
            seed: None,
            keep_records: true,
        }
    }
}

/// Totals and rates of a finished simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub predictor: String,
    pub opponent: String,
    pub rounds: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// Wins over decisive rounds
    pub ai_win_rate: f64,
    /// Losses over decisive rounds
    pub player_win_rate: f64,
    /// Ties over all rounds
    pub tie_rate: f64,
}

impl SimulationSummary {
    fn new(predictor: &str, opponent: &str, tally: &Tally) -> Self {
        let stats = tally.stats();
        let rounds = tally.rounds();
        Self {
            predictor: predictor.to_string(),
            opponent: opponent.to_string(),
            rounds,
            wins: stats.wins,
            losses: stats.losses,
            ties: stats.ties,
            ai_win_rate: stats.ai_win_rate,
            player_win_rate: stats.player_win_rate,
            tie_rate: if rounds > 0 {
                stats.ties as f64 / rounds as f64
            } else {
                0.0
            },
        }
    }

    /// Save summary to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Outcome of [`Simulation::run`]
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub summary: SimulationSummary,
    /// Ledger rows, empty unless `keep_records` was set
    pub records: Vec<RoundRecord>,
}

impl SimulationResult {
    /// Write the ledger as CSV.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_ledger(&self.records, path)
    }
}

/// Write ledger rows to a CSV file with a header line.
pub fn write_ledger<P: AsRef<Path>>(records: &[RoundRecord], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a ledger written by [`write_ledger`] or a CSV observer.
pub fn read_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<RoundRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Plays a fixed number of rounds and notifies observers after each one
pub struct Simulation {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulation
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(
        &mut self,
        predictor: &mut dyn Predictor,
        opponent: &mut dyn Opponent,
    ) -> Result<SimulationResult> {
        if let Some(seed) = self.config.seed {
            predictor.set_rng_seed(seed);
            opponent.set_rng_seed(seed.wrapping_add(1));
        }

        let rounds = self.config.rounds;
        info!(
            "Simulating {rounds} rounds: {} vs {}",
            predictor.name(),
            opponent.name()
        );

        for observer in &mut self.observers {
            observer.on_session_start(rounds)?;
        }

        let mut tally = Tally::default();
        let mut records = Vec::with_capacity(if self.config.keep_records { rounds } else { 0 });
        for _ in 0..rounds {
            let record = play_round(predictor, opponent, &mut tally);
            for observer in &mut self.observers {
                observer.on_round(&record)?;
            }
            if self.config.keep_records {
                records.push(record);
            }
        }

        for observer in &mut self.observers {
            observer.on_session_end()?;
        }

        let summary = SimulationSummary::new(predictor.name(), opponent.name(), &tally);
        info!(
            "Finished: {} wins, {} losses, {} ties (AI win rate {:.1}%)",
            summary.wins,
            summary.losses,
            summary.ties,
            summary.ai_win_rate * 100.0
        );

        Ok(SimulationResult { summary, records })
    }
}
