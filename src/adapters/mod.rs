//! Adapters implementing the ports.
//!
//! File formats and data sources live here; the training core only sees the
//! traits in [`crate::ports`].

mod atomic;
pub mod csv_samples;
pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;

use std::path::Path;

pub use csv_samples::CsvSampleSource;
pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;

use crate::ports::ModelRepository;

/// Pick the file format from the extension: `.json` is JSON, anything else
/// MessagePack.
pub fn repository_for_path(path: &Path) -> Box<dyn ModelRepository + Send + Sync> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonRepository::new())
    } else {
        Box::new(MsgPackRepository::new())
    }
}
