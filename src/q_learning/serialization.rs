//! Serialization support for Q-learning agents.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::AgentConfig,
    q_learning::{agent::QLearningAgent, q_table::QTable},
    tictactoe::Player,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    QLearning,
}

/// Provenance recorded alongside a saved table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of training episodes completed
    pub episodes_trained: Option<usize>,
    /// Number of bootstrap pretraining steps replayed
    pub pretrain_steps: Option<usize>,
    /// How the table was trained (e.g. "self-play", "random")
    pub trained_against: Option<String>,
    /// Which mark the table learned to play, if fixed
    pub agent_player: Option<Player>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

impl TrainingMetadata {
    /// Whether the table can play `player`. Tables without a fixed mark fit
    /// either side.
    pub fn fits(&self, player: Player) -> bool {
        self.agent_player.is_none_or(|trained| trained == player)
    }
}

/// On-disk form of a trained agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub config: AgentConfig,
    /// Exploration rate at save time
    pub epsilon: f64,
    pub metadata: TrainingMetadata,
    pub q_table: QTable,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            algorithm: TdAlgorithm::QLearning,
            config: *agent.config(),
            epsilon: agent.epsilon(),
            metadata,
            q_table: agent.q_table().clone(),
        }
    }

    /// Rebuild the agent, restoring the saved ε.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] for an unsupported format version and
    /// [`Error::InvalidConfiguration`] if the stored hyper-parameters are invalid.
    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(Error::Persistence {
                operation: "decode".to_string(),
                path: String::new(),
                message: format!(
                    "unsupported save format version {}, expected {}",
                    self.version,
                    Self::VERSION
                ),
            });
        }

        let mut agent = QLearningAgent::with_table(self.config, self.q_table.clone())?;
        agent.set_epsilon(self.epsilon);
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StateKey;

    #[test]
    fn test_q_learning_roundtrip() -> Result<()> {
        let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(7))?;
        let state: StateKey = "X...O...._X".parse()?;
        agent.q_table_mut().set(&state, 8, 0.125);
        agent.decay_epsilon();

        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        let bytes = rmp_serde::to_vec(&saved).map_err(|e| Error::Persistence {
            operation: "encode".to_string(),
            path: String::new(),
            message: e.to_string(),
        })?;
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes).map_err(|e| Error::Persistence {
            operation: "decode".to_string(),
            path: String::new(),
            message: e.to_string(),
        })?;
        let restored = loaded.to_agent()?;

        assert_eq!(restored.q_table_size(), agent.q_table_size());
        assert_eq!(restored.q_table().get(&state, 8), 0.125);
        assert_eq!(restored.epsilon(), agent.epsilon());
        Ok(())
    }

    #[test]
    fn test_unknown_version_rejected() {
        let agent = QLearningAgent::new(AgentConfig::default()).unwrap();
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 99;
        let err = saved.to_agent().unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_metadata_mark_fit() {
        let trained_o = TrainingMetadata {
            agent_player: Some(Player::O),
            ..TrainingMetadata::default()
        };
        assert!(trained_o.fits(Player::O));
        assert!(!trained_o.fits(Player::X));

        let alternating = TrainingMetadata::default();
        assert!(alternating.fits(Player::X));
        assert!(alternating.fits(Player::O));
    }
}
