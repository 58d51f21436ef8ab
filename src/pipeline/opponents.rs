//! Scripted opponents that never learn.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{Error, Result, ports::Policy, q_learning::agent::build_rng, types::StateKey};

/// Plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    /// Non-deterministic when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _state: &StateKey, legal_actions: &[usize]) -> Result<usize> {
        legal_actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
