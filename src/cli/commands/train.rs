//! Train command - Train the Q-learning predictor and store a snapshot

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::LearnerArgs,
        output::{format_number, print_kv, print_section, print_stats},
    },
    pipeline::{ProgressObserver, TrainingPipeline},
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning predictor")]
pub struct TrainArgs {
    #[command(flatten)]
    pub learner: LearnerArgs,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.learner.q_learning_config()?;
    let app = args.learner.app();

    let mut learner = app
        .create_q_learner(&config)
        .context("Failed to create Q-learner")?;

    print_section("Q-Learning Training");
    print_kv("Snapshot store", &args.learner.snapshots.display().to_string());
    print_kv("Discount factor", &config.discount_factor.to_string());
    print_kv("Decay rate", &config.decay_rate.to_string());

    if learner.is_trained() {
        println!("\nStored snapshot found; nothing to train.");
        print_kv("Episodes", &format_number(learner.episodes() as usize));
        print_kv("Epsilon", &format!("{:.4}", learner.epsilon()));
        print_kv("States learned", &format_number(learner.q_table().len()));
        return Ok(());
    }

    print_kv("Opponent", &config.training_opponent.to_string());
    print_kv("Episodes", &format_number(config.training_episodes));
    print_kv("Initial epsilon", &format!("{:.4}", learner.epsilon()));

    let mut opponent = config.training_opponent.build(None)?;
    let mut pipeline = TrainingPipeline::new(config.training());
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let Some(result) = pipeline.run(&mut learner, opponent.as_mut())? else {
        return Ok(());
    };

    print_section("Training Results");
    print_stats(&result.stats);
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    print_kv("States learned", &format_number(result.states_learned));
    print_kv(
        "Snapshot saved",
        if result.snapshot_saved { "yes" } else { "no" },
    );

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
