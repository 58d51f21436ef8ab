//! Tabular Q-learning
//!
//! One-step off-policy TD control over an exact (state, action) table:
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! with the bootstrap term dropped on terminal transitions.
//!
//! ## Usage Example
//!
//! ```
//! use ttt_qlearn::{app::AgentConfig, q_learning::QLearningAgent, tictactoe::TicTacToe};
//!
//! let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(1))?;
//! let mut env = TicTacToe::new();
//! env.reset();
//!
//! let state = env.state_key();
//! let legal = env.legal_actions();
//! let action = agent.select_action(&state, &legal, true)?;
//! let step = env.step(action)?;
//! agent.update(&state, action, step.reward, &env.state_key(), &env.legal_actions(), step.done);
//! # Ok::<(), ttt_qlearn::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::QTable;
pub use serialization::{SavedAgent, TdAlgorithm, TrainingMetadata};
