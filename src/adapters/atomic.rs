//! Atomic file replacement shared by the file-backed repositories.

use std::{fmt::Display, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{Error, Result};

pub(crate) fn persistence_error(operation: &str, path: &Path, err: impl Display) -> Error {
    Error::Persistence {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The target is replaced by a rename, so an interrupted write leaves either the
/// previous file or nothing, never a truncated model.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| persistence_error("create temporary file for", path, e))?;
    tmp.write_all(bytes)
        .map_err(|e| persistence_error("write", path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| persistence_error("flush", path, e))?;
    tmp.persist(path)
        .map_err(|e| persistence_error("replace", path, e.error))?;
    Ok(())
}
