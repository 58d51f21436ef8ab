//! Q-learning agent
//!
//! Wraps a [`QTable`] with ε-greedy action selection and the one-step
//! Q-learning update.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result, app::AgentConfig, ports::Policy, q_learning::q_table::QTable,
    types::StateKey,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by always bootstrapping from the maximum next-state value,
/// regardless of the action taken next. All randomness (exploration and
/// tie-breaking) comes from the agent's own seedable generator.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: AgentConfig,
    q_table: QTable,
    epsilon: f64,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a hyper-parameter is out of range.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_table(config, QTable::new())
    }

    /// Create an agent around an existing table, starting at the configured ε.
    pub fn with_table(config: AgentConfig, q_table: QTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            q_table,
            epsilon: config.epsilon,
            rng: build_rng(config.seed),
        })
    }

    /// Reseed the agent's random generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Choose an action among `legal_actions`.
    ///
    /// When `exploratory` is set, a uniform draw below ε yields a uniformly
    /// random legal action. Otherwise the action with the highest estimate is
    /// returned, unseen pairs counting as 0.0 and ties broken uniformly at
    /// random rather than by position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `legal_actions` is empty.
    pub fn select_action(
        &mut self,
        state: &StateKey,
        legal_actions: &[usize],
        exploratory: bool,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoValidMoves);
        }

        if exploratory && self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            return legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoValidMoves);
        }

        let best = self.q_table.best_actions(state, legal_actions);
        best.choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    /// One-step TD target: `reward` when `done`, else
    /// `reward + γ · max_a' Q(next_state, a')` with an empty max taken as 0.
    pub fn td_target(
        &self,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[usize],
        done: bool,
    ) -> f64 {
        if done {
            reward
        } else {
            reward + self.config.discount_factor * self.q_table.max_q(next_state, next_legal_actions)
        }
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α[target - Q(s,a)], creating the entry at 0.0 if
    /// it did not exist.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[usize],
        done: bool,
    ) {
        let target = self.td_target(reward, next_state, next_legal_actions, done);
        self.q_table
            .td_update(state, action, target, self.config.learning_rate);
    }

    /// Decay epsilon after an episode: ε ← max(ε_min, ε · decay)
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.len()
    }
}

impl Policy for QLearningAgent {
    /// Greedy play: never explores
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Result<usize> {
        self.select_action(state, legal_actions, false)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
