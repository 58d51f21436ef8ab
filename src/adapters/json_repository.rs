//! JSON implementation of the model repository.

use std::{fs::File, io::BufReader, path::Path};

use super::atomic::{persistence_error, write_atomically};
use crate::{Result, ports::ModelRepository, q_learning::SavedAgent};

/// Pretty-printed JSON model files, readable and diffable.
///
/// State keys appear as labels such as `"X...O...._X"` and actions as string
/// keys `"0"`..`"8"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl ModelRepository for JsonRepository {
    fn save(&self, model: &SavedAgent, path: &Path) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(model).map_err(|e| persistence_error("encode", path, e))?;
        write_atomically(path, &bytes)
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|e| persistence_error("open", path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| persistence_error("decode", path, e))
    }
}
