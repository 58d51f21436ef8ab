//! MessagePack implementation of the model repository.
//!
//! This adapter implements the ModelRepository port using rmp_serde for
//! compact binary serialization.

use std::{fs::File, io::BufReader, path::Path};

use super::atomic::{persistence_error, write_atomically};
use crate::{Result, ports::ModelRepository, q_learning::SavedAgent};

/// MessagePack-based model repository.
///
/// Floats are stored as 64-bit values, so reloaded tables are bit-identical.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use ttt_qlearn::{
///     adapters::MsgPackRepository,
///     app::AgentConfig,
///     ports::ModelRepository,
///     q_learning::{QLearningAgent, SavedAgent, TrainingMetadata},
/// };
///
/// let agent = QLearningAgent::new(AgentConfig::default())?;
/// let repo = MsgPackRepository::new();
/// repo.save(
///     &SavedAgent::from_agent(&agent, TrainingMetadata::default()),
///     Path::new("trained.msgpack"),
/// )?;
/// let loaded = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), ttt_qlearn::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl ModelRepository for MsgPackRepository {
    fn save(&self, model: &SavedAgent, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(model)
            .map_err(|e| persistence_error("encode", path, e))?;
        write_atomically(path, &bytes)
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|e| persistence_error("open", path, e))?;
        rmp_serde::decode::from_read(BufReader::new(file))
            .map_err(|e| persistence_error("decode", path, e))
    }
}
