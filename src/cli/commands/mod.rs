//! Subcommands of the `ttt-qlearn` binary

pub mod dataset;
pub mod evaluate;
pub mod play;
pub mod train;
