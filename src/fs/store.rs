//! Load and save the work-unit document.
//!
//! Saves are atomic: the document is written to a temporary file in the same
//! directory and renamed over the target, so lock-free readers observe either
//! the previous or the new document and never a partial write.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{Result, WorkflowError};
use crate::models::Document;

/// Read the document at `path`, materializing an empty one if it is absent.
///
/// Takes no lock. Callers that only display data use this directly; a
/// concurrent writer may commit right after the read.
pub fn read_document(path: &Path) -> Result<Document> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(document = %path.display(), "no work-unit document yet, using default");
            return Ok(Document::default());
        }
        Err(err) => return Err(WorkflowError::io(path, err)),
    };

    if content.trim().is_empty() {
        return Ok(Document::default());
    }

    serde_json::from_str(&content).map_err(|source| WorkflowError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replace the document at `path`.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| WorkflowError::io(dir, e))?;

    let mut content = serde_json::to_string_pretty(document).map_err(WorkflowError::Serialize)?;
    content.push('\n');

    let temp = NamedTempFile::new_in(dir).map_err(|e| WorkflowError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| WorkflowError::io(temp.path(), e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| WorkflowError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| WorkflowError::io(path, e.error))?;

    tracing::debug!(document = %path.display(), bytes = content.len(), "wrote work-unit document");
    Ok(())
}
