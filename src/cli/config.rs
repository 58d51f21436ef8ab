//! Settings file for the `train` command

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::{AgentConfig, PretrainConfig},
    pipeline::TrainingConfig,
};

/// JSON settings accepted by `train --config`.
///
/// Every field is optional; explicit command-line flags override the file.
///
/// ```json
/// {
///   "agent": { "learning_rate": 0.3, "epsilon_decay": 0.9999 },
///   "training": { "episodes": 20000, "mode": "self_play" },
///   "pretrain": { "steps": 2000 },
///   "data_file": "data/tic-tac-toe.data"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainSettings {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
    pub pretrain: PretrainConfig,
    /// Historical data file used for pretraining
    pub data_file: Option<PathBuf>,
    /// Skip bootstrap pretraining
    pub skip_pretrain: bool,
}

impl TrainSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open settings file '{}'", path.display()),
            source,
        })?;
        let settings: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        settings.agent.validate()?;
        Ok(settings)
    }
}
