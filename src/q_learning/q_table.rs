//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Q-table mapping (state, action) pairs to value estimates
///
/// Reads never insert: an absent pair reports the caller's default (0.0 via
/// [`get`](Self::get)). Entries are only created by [`set`](Self::set) and
/// [`td_update`](Self::td_update), so [`len`](Self::len) counts exactly the
/// pairs that have been learned. Entries are never pruned.
///
/// Serializes as a map from state label to a map from action to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    values: HashMap<StateKey, HashMap<usize, f64>>,
}

impl QTable {
    /// Default estimate for pairs that have never been updated
    pub const DEFAULT_VALUE: f64 = 0.0;

    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair, 0.0 if unseen
    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.get_or(state, action, Self::DEFAULT_VALUE)
    }

    /// Get Q-value for a state-action pair, `default` if unseen
    pub fn get_or(&self, state: &StateKey, action: usize, default: f64) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(default)
    }

    /// Insert or overwrite the Q-value for a state-action pair
    pub fn set(&mut self, state: &StateKey, action: usize, value: f64) {
        self.values.entry(*state).or_default().insert(action, value);
    }

    pub fn contains(&self, state: &StateKey, action: usize) -> bool {
        self.values
            .get(state)
            .is_some_and(|actions| actions.contains_key(&action))
    }

    /// Maximum Q-value over `legal_actions`; 0.0 for an empty set
    pub fn max_q(&self, state: &StateKey, legal_actions: &[usize]) -> f64 {
        if legal_actions.is_empty() {
            return 0.0;
        }
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All legal actions sharing the maximum Q-value, in the order given
    pub fn best_actions(&self, state: &StateKey, legal_actions: &[usize]) -> Vec<usize> {
        let best = self.max_q(state, legal_actions);
        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Move the estimate for (state, action) toward `target`.
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)]
    ///
    /// Returns the new estimate.
    pub fn td_update(
        &mut self,
        state: &StateKey,
        action: usize,
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        let current_q = self.get(state, action);
        let new_q = current_q + learning_rate * (target - current_q);
        self.set(state, action, new_q);
        new_q
    }

    /// Iterate over every stored (state, action, value) triple
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, usize, f64)> {
        self.values.iter().flat_map(|(state, actions)| {
            actions
                .iter()
                .map(move |(&action, &value)| (state, action, value))
        })
    }

    /// Total number of stored state-action pairs
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct states with at least one stored action
    pub fn state_count(&self) -> usize {
        self.values.len()
    }
}
