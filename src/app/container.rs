//! Dependency container for the Q-learning application.
//!
//! Owns the persistence adapter and the default seed, and hands out agents
//! wired to them.

use std::{path::Path, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::repository_for_path,
    ports::ModelRepository,
    q_learning::{QLearningAgent, SavedAgent, TrainingMetadata},
};

/// Application with dependency injection.
///
/// Without an explicit repository the file format follows the path: `.json`
/// files are JSON, everything else MessagePack.
///
/// # Examples
///
/// ```
/// use ttt_qlearn::app::{AgentConfig, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::default().with_seed(42))?;
/// assert_eq!(agent.q_table_size(), 0);
/// # Ok::<(), ttt_qlearn::Error>(())
/// ```
///
/// ```
/// use ttt_qlearn::adapters::InMemoryRepository;
/// use ttt_qlearn::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository override; `None` picks the format per path
    repository: Option<Arc<dyn ModelRepository + Send + Sync>>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Builder for injecting an in-memory repository or a fixed seed.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Create a fresh agent, falling back to the app's default seed.
    pub fn create_agent(&self, config: AgentConfig) -> Result<QLearningAgent> {
        let mut config = config;
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        QLearningAgent::new(config)
    }

    /// Load a saved model together with its provenance.
    pub fn load_model(&self, path: &Path) -> Result<SavedAgent> {
        match &self.repository {
            Some(repository) => repository.load(path),
            None => repository_for_path(path).load(path),
        }
    }

    /// Load an agent from a model file, restoring its saved ε.
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use ttt_qlearn::app::App;
    ///
    /// let agent = App::new().load_agent(Path::new("q_agent.x.msgpack"))?;
    /// # Ok::<(), ttt_qlearn::Error>(())
    /// ```
    pub fn load_agent(&self, path: &Path) -> Result<QLearningAgent> {
        let mut agent = self.load_model(path)?.to_agent()?;
        if let Some(seed) = self.default_seed {
            agent.reseed(seed);
        }
        Ok(agent)
    }

    pub fn save_agent(
        &self,
        agent: &QLearningAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let model = SavedAgent::from_agent(agent, metadata);
        match &self.repository {
            Some(repository) => repository.save(&model, path),
            None => repository_for_path(path).save(&model, path),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an [`App`] with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn ModelRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Use `repo` for every load and save regardless of extension.
    pub fn with_repository<R: ModelRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this app.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    pub fn build(self) -> App {
        App {
            repository: self.repository,
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
