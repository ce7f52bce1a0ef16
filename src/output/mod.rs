pub mod json;

use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::model::IndexDocument;

/// Render the index and write it to `path` in one shot.
///
/// Missing parent directories are created. Returns the absolute path that
/// was written.
pub fn write(document: &IndexDocument, path: &Path, pretty: bool) -> Result<PathBuf> {
    let path = std::path::absolute(path)?;
    if path.is_dir() {
        return Err(IndexError::Output(format!(
            "output path is a directory: {}",
            path.display()
        )));
    }

    let rendered = json::render(document, pretty)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, rendered)?;

    tracing::info!(path = %path.display(), count = document.count(), "index written");
    Ok(path)
}
