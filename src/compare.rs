//! The tree-comparator boundary.
//!
//! The engine consumes an ordered sequence of raw `(kind, path)` pairs
//! from a [`TreeComparator`] and maps them onto its own change
//! vocabulary; the kind is an open string here precisely so the diff
//! collector can detect and reject tags it does not recognize.
//!
//! [`WalkComparator`] is the default implementation: a per-directory
//! comparison over sorted entry names that recurses only into
//! directories present on both sides, so a directory that exists on one
//! side only yields a single dir-level entry (its recursive add or
//! delete happens in one replay step). It cannot emit the same path
//! twice except for the deliberate `deleted`-then-`new` pair produced
//! when a path is a file on one side and a directory on the other.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::SyncError;

/// Kind tag for a path present only in the source tree.
pub const KIND_NEW: &str = "new";
/// Kind tag for a path present in both trees with differing contents.
pub const KIND_MODIFIED: &str = "modified";
/// Kind tag for a path present only in the target tree.
pub const KIND_DELETED: &str = "deleted";

/// One raw comparator result: an open kind tag plus a path relative to
/// the compared roots (forward slashes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawChange {
    pub kind: String,
    pub path: String,
}

impl RawChange {
    pub fn new(kind: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
}

/// Compares two directory trees and yields classified differences in a
/// stable order.
pub trait TreeComparator {
    /// Compare `target_root` (the workspace being written) against
    /// `source_root` (the tree being replayed from).
    fn compare(&self, target_root: &Path, source_root: &Path)
    -> Result<Vec<RawChange>, SyncError>;
}

/// Filesystem-walking comparator, content-based.
pub struct WalkComparator;

impl TreeComparator for WalkComparator {
    fn compare(
        &self,
        target_root: &Path,
        source_root: &Path,
    ) -> Result<Vec<RawChange>, SyncError> {
        let mut changes = Vec::new();
        compare_dir(target_root, source_root, "", &mut changes)?;
        Ok(changes)
    }
}

fn compare_dir(
    target: &Path,
    source: &Path,
    rel: &str,
    changes: &mut Vec<RawChange>,
) -> Result<(), SyncError> {
    let source_names = entry_names(source)?;
    let target_names = entry_names(target)?;

    for name in source_names.union(&target_names) {
        let rel_path = if rel.is_empty() {
            name.clone()
        } else {
            format!("{rel}/{name}")
        };
        match (source_names.contains(name), target_names.contains(name)) {
            (true, false) => changes.push(RawChange::new(KIND_NEW, rel_path)),
            (false, true) => changes.push(RawChange::new(KIND_DELETED, rel_path)),
            (true, true) => {
                let source_path = source.join(name);
                let target_path = target.join(name);
                match (source_path.is_dir(), target_path.is_dir()) {
                    (true, true) => compare_dir(&target_path, &source_path, &rel_path, changes)?,
                    (false, false) => {
                        if file_differs(&target_path, &source_path)? {
                            changes.push(RawChange::new(KIND_MODIFIED, rel_path));
                        }
                    }
                    // File on one side, directory on the other: the old
                    // node must go before the new one can be copied.
                    _ => {
                        changes.push(RawChange::new(KIND_DELETED, rel_path.clone()));
                        changes.push(RawChange::new(KIND_NEW, rel_path));
                    }
                }
            }
            (false, false) => unreachable!("name came from one of the two sets"),
        }
    }
    Ok(())
}

fn entry_names(dir: &Path) -> Result<BTreeSet<String>, SyncError> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        names.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

fn file_differs(a: &Path, b: &Path) -> Result<bool, SyncError> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(true);
    }
    Ok(fs::read(a)? != fs::read(b)?)
}
