//! CLI infrastructure for the rock/paper/scissors predictor
//!
//! This module provides the command-line interface for training the
//! Q-learner, running batch simulations and playing interactively.

pub mod commands;
pub mod config;
pub mod output;
