//! Subcommands of the `rps` binary

pub mod play;
pub mod simulate;
pub mod train;
