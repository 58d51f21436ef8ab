//! Policy port - anything that can pick a move
//!
//! Evaluation and interactive play only need a move chooser; they do not care
//! whether it is a learned table played greedily or a scripted opponent.

use crate::{Result, types::StateKey};

/// Chooses one action for a decision point.
///
/// Implemented by [`QLearningAgent`](crate::q_learning::QLearningAgent) (greedy,
/// no exploration) and by the scripted opponents in
/// [`pipeline::opponents`](crate::pipeline::opponents).
pub trait Policy {
    /// Pick a move from `legal_actions` for `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if `legal_actions` is empty.
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Result<usize>;

    /// Name used in reports
    fn name(&self) -> &str;
}
