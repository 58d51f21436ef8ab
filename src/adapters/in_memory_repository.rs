//! In-memory model repository for testing.
//!
//! Stores encoded models in a shared map instead of the file system, so tests
//! still exercise the MessagePack encoding without touching disk.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::atomic::persistence_error;
use crate::{Result, ports::ModelRepository, q_learning::SavedAgent};

/// In-memory repository for testing.
///
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of models currently stored
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&path.to_string_lossy().to_string())
    }
}

impl ModelRepository for InMemoryRepository {
    fn save(&self, model: &SavedAgent, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(model).map_err(|e| persistence_error("encode", path, e))?;
        self.storage()
            .insert(path.to_string_lossy().to_string(), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let storage = self.storage();
        let bytes = storage
            .get(&path.to_string_lossy().to_string())
            .ok_or_else(|| persistence_error("load", path, "no model stored under this key"))?;
        rmp_serde::from_slice(bytes).map_err(|e| persistence_error("decode", path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AgentConfig,
        q_learning::{QLearningAgent, TrainingMetadata},
    };

    fn saved() -> SavedAgent {
        let agent = QLearningAgent::new(AgentConfig::default()).unwrap();
        SavedAgent::from_agent(&agent, TrainingMetadata::default())
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("model");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&saved(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));
        assert_eq!(repo.load(path).unwrap(), saved());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).unwrap_err().is_persistence());
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        repo1.save(&saved(), Path::new("shared")).unwrap();
        assert!(repo2.load(Path::new("shared")).is_ok());
        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
