//! Filesystem primitives used by the replay engine.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SyncError;

/// Every descendant file of `root`, in deterministic (name-sorted,
/// parents-first) order. A plain file yields itself; a missing path
/// yields nothing. Directories are never included — only files are
/// tracked by the target VCS.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| SyncError::Io(io::Error::from(e)))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Remove a file or directory tree. Idempotent: a missing path is fine.
pub fn remove_recursive(path: &Path) -> Result<(), SyncError> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::Io(e)),
    }
}
