//! Tabular Q-learning for tic-tac-toe
//!
//! This crate provides:
//! - A two-player tic-tac-toe environment with terminal detection and an
//!   in-band penalty for moves onto occupied cells
//! - A Q-learning agent with ε-greedy exploration and random tie-breaking
//! - Self-play and random-opponent training, with bootstrap pretraining on
//!   historical games
//! - Evaluation, MessagePack/JSON model files and a console front end
//!
//! ```
//! use ttt_qlearn::app::AgentConfig;
//! use ttt_qlearn::pipeline::{Evaluator, RandomPolicy, TrainingConfig, TrainingPipeline};
//! use ttt_qlearn::q_learning::QLearningAgent;
//!
//! let config = AgentConfig::default().with_epsilon_schedule(1.0, 0.99, 0.1);
//! let mut agent_x = QLearningAgent::new(config)?;
//! let mut agent_o = QLearningAgent::new(config)?;
//!
//! let training = TrainingConfig { episodes: 200, seed: Some(7), ..TrainingConfig::default() };
//! TrainingPipeline::new(training).run_self_play(&mut agent_x, &mut agent_o)?;
//!
//! let result = Evaluator::new(50).run(&mut agent_x, &mut RandomPolicy::new(Some(1)))?;
//! assert_eq!(result.games, 50);
//! # Ok::<(), ttt_qlearn::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use types::StateKey;
