//! Repository port for model persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedAgent};

/// Port for persisting and loading trained agents.
///
/// Implementations must reproduce every stored (state, action) value exactly on
/// load; absent pairs keep reading as 0.0 through the table's default.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use ttt_qlearn::{ports::ModelRepository, q_learning::SavedAgent};
///
/// fn save_model<R: ModelRepository>(
///     repo: &R,
///     model: &SavedAgent,
///     path: &Path,
/// ) -> ttt_qlearn::Result<()> {
///     repo.save(model, path)
/// }
/// ```
pub trait ModelRepository {
    /// Save a model.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the model cannot be encoded or
    /// written. A failed save never leaves a partially written file at `path`.
    fn save(&self, model: &SavedAgent, path: &Path) -> Result<()>;

    /// Load a model.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the file is missing, unreadable
    /// or not a valid model.
    fn load(&self, path: &Path) -> Result<SavedAgent>;
}
