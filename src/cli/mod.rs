//! CLI infrastructure for training, evaluating and playing against
//! Q-learning agents.

pub mod commands;
pub mod config;
pub mod output;
