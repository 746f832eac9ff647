//! Play command - Interactive game on stdin/stdout

use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{cli::config::PredictorArgs, session::GameSession};

#[derive(Parser, Debug)]
#[command(about = "Play against a predictor interactively")]
pub struct PlayArgs {
    #[command(flatten)]
    pub predictor: PredictorArgs,

    /// Stop after this many rounds (0 = unlimited)
    #[arg(long, short = 'n', default_value_t = 0)]
    pub rounds: usize,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.predictor.predictor_config()?;
    let app = args.predictor.learner.app();

    let mut predictor = app
        .create_predictor(&config)
        .context("Failed to create predictor")?;
    println!("Playing against the {} predictor", predictor.name());

    let stdin = io::stdin();
    GameSession::new(predictor.as_mut())
        .with_round_limit(args.rounds)
        .run(stdin.lock(), io::stdout().lock())
        .context("Game session failed")?;

    Ok(())
}
