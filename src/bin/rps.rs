//! rps - Rock/paper/scissors prediction engine
//!
//! This CLI provides a unified interface for:
//! - Training the Q-learning predictor and storing snapshots
//! - Simulating predictors against scripted opponents
//! - Playing against a predictor interactively

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rps")]
#[command(version, about = "Rock/paper/scissors prediction engine", long_about = None)]
struct Cli {
    /// Log progress details (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-learning predictor
    Train(rps_predictor::cli::commands::train::TrainArgs),

    /// Simulate a predictor against an opponent
    Simulate(rps_predictor::cli::commands::simulate::SimulateArgs),

    /// Play against a predictor interactively
    Play(rps_predictor::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Train(args) => rps_predictor::cli::commands::train::execute(args),
        Commands::Simulate(args) => rps_predictor::cli::commands::simulate::execute(args),
        Commands::Play(args) => rps_predictor::cli::commands::play::execute(args),
    }
}
