//! Shared helpers for the integration tests.
#![allow(dead_code)]

use ttt_qlearn::{
    app::AgentConfig,
    q_learning::QLearningAgent,
    tictactoe::{Step, TicTacToe},
};

/// Play `actions` from a fresh game, returning every step.
pub fn play_sequence(actions: &[usize]) -> (TicTacToe, Vec<Step>) {
    let mut env = TicTacToe::new();
    env.reset();
    let steps = actions
        .iter()
        .map(|&action| env.step(action).unwrap())
        .collect();
    (env, steps)
}

/// Agent with default hyper-parameters and a fixed seed.
pub fn seeded_agent(seed: u64) -> QLearningAgent {
    QLearningAgent::new(AgentConfig::default().with_seed(seed)).unwrap()
}
