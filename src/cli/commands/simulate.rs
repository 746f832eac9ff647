//! Simulate command - Play a predictor against a scripted opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::{
    cli::{
        config::PredictorArgs,
        output::{format_number, format_percent, print_kv, print_section, print_stats, print_subsection},
    },
    opponents::OpponentKind,
    pipeline::{
        CsvObserver, MetricsObserver, ProgressObserver, Simulation, SimulationConfig,
    },
    ports::Observer,
};

#[derive(Parser, Debug)]
#[command(about = "Simulate a predictor against an opponent")]
pub struct SimulateArgs {
    #[command(flatten)]
    pub predictor: PredictorArgs,

    /// Opponent to play against
    #[arg(long, short = 'o', default_value = "uniform")]
    pub opponent: String,

    /// Number of rounds
    #[arg(long, short = 'n', default_value_t = 1000)]
    pub rounds: usize,

    /// Optional CSV file receiving one ledger row per round
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Rounds in the rolling win rate window
    #[arg(long, default_value_t = MetricsObserver::DEFAULT_WINDOW)]
    pub window: usize,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let opponent_kind: OpponentKind = args.opponent.parse().context("Invalid --opponent")?;
    let config = args.predictor.predictor_config()?;
    let app = args.predictor.learner.app();

    let mut predictor = app
        .create_predictor(&config)
        .context("Failed to create predictor")?;
    let seed = args.predictor.learner.seed;
    let mut opponent = opponent_kind.build(seed.map(|s| s.wrapping_add(1)))?;

    let mut simulation = Simulation::new(SimulationConfig {
        rounds: args.rounds,
        seed: None,
        keep_records: true,
    });
    if args.progress {
        simulation = simulation.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.csv {
        let csv = CsvObserver::create(path)
            .with_context(|| format!("Failed to create CSV ledger {}", path.display()))?;
        simulation = simulation.with_observer(Box::new(csv));
    }

    let result = simulation.run(predictor.as_mut(), opponent.as_mut())?;

    let mut metrics = MetricsObserver::with_window(args.window);
    metrics.on_session_start(result.records.len())?;
    for record in &result.records {
        metrics.on_round(record)?;
    }
    let metrics = metrics.summary();

    print_section(&format!(
        "{} vs {}",
        result.summary.predictor, result.summary.opponent
    ));
    print_stats(&predictor.stats());
    print_kv("Tie rate", &format_percent(result.summary.tie_rate));

    print_subsection("Rolling window");
    print_kv(
        &format!("Last {} win rate", format_number(metrics.window)),
        &format_percent(metrics.rolling_win_rate),
    );
    print_kv("Best rolling rate", &format_percent(metrics.best_rolling_win_rate));

    if let Some(path) = &args.csv {
        println!("\nLedger written to {}", path.display());
    }
    if let Some(path) = &args.summary {
        result
            .summary
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
