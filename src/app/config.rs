//! Configuration types for agent creation and pretraining.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyper-parameters of a Q-learning agent.
///
/// Builder-style and serializable so that the same values can come from code,
/// a JSON settings file or a saved model.
///
/// # Examples
///
/// ```
/// use ttt_qlearn::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.3)
///     .with_epsilon_schedule(1.0, 0.999, 0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in [0, 1]
    pub discount_factor: f64,
    /// Initial exploration rate ε in [0, 1]
    pub epsilon: f64,
    /// Multiplicative ε decay applied after every episode, in (0, 1]
    pub epsilon_decay: f64,
    /// Lower bound for ε
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
    pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.99;
    pub const DEFAULT_EPSILON: f64 = 1.0;
    pub const DEFAULT_EPSILON_DECAY: f64 = 0.99995;
    pub const DEFAULT_MIN_EPSILON: f64 = 0.05;

    pub fn new() -> Self {
        Self {
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount_factor: Self::DEFAULT_DISCOUNT_FACTOR,
            epsilon: Self::DEFAULT_EPSILON,
            epsilon_decay: Self::DEFAULT_EPSILON_DECAY,
            min_epsilon: Self::DEFAULT_MIN_EPSILON,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set initial ε, its per-episode decay and its floor.
    pub fn with_epsilon_schedule(mut self, epsilon: f64, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let check = |ok: bool, message: String| {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration { message })
            }
        };

        check(
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            format!("learning_rate {} must be in (0, 1]", self.learning_rate),
        )?;
        check(
            (0.0..=1.0).contains(&self.discount_factor),
            format!("discount_factor {} must be in [0, 1]", self.discount_factor),
        )?;
        check(
            (0.0..=1.0).contains(&self.epsilon),
            format!("epsilon {} must be in [0, 1]", self.epsilon),
        )?;
        check(
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
            format!("epsilon_decay {} must be in (0, 1]", self.epsilon_decay),
        )?;
        check(
            (0.0..=1.0).contains(&self.min_epsilon),
            format!("min_epsilon {} must be in [0, 1]", self.min_epsilon),
        )
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for bootstrap pretraining on historical positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PretrainConfig {
    /// Number of sampled positions replayed per table
    pub steps: usize,
    /// Number of random games generated when the data source is missing
    pub synthetic_samples: usize,
    /// Emit a progress log line every this many steps (0 disables)
    pub log_every: usize,
}

impl PretrainConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_synthetic_samples(mut self, samples: usize) -> Self {
        self.synthetic_samples = samples;
        self
    }
}

impl Default for PretrainConfig {
    fn default() -> Self {
        Self {
            steps: 5_000,
            synthetic_samples: 1_000,
            log_every: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_learning_rate() {
        let err = AgentConfig::default()
            .with_learning_rate(0.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_rejects_discount_above_one() {
        assert!(
            AgentConfig::default()
                .with_discount_factor(1.5)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"learning_rate": 0.25}"#).unwrap();
        assert_eq!(config.learning_rate, 0.25);
        assert_eq!(config.discount_factor, AgentConfig::DEFAULT_DISCOUNT_FACTOR);
        assert_eq!(config.seed, None);
    }
}
