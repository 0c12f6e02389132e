//! Diff collection and validation.
//!
//! [`collect`] invokes the tree comparator, drops ignored paths, and
//! maps the surviving raw kinds onto [`ChangeKind`]. An empty filtered
//! result is a legitimate no-op, reported as an empty list; a kind tag
//! outside the recognized set fails the whole collection, no matter
//! where in the sequence it occurs. Comparator order is preserved —
//! later entries may depend on directories created by earlier ones.

use std::fmt;

use crate::compare::{KIND_DELETED, KIND_MODIFIED, KIND_NEW, TreeComparator};
use crate::error::SyncError;
use crate::ignore::IgnoreSet;
use crate::session::SyncSession;

/// The three recognized change kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Upper-case label used in change listings and replay logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "NEW",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified path difference between the two trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEntry {
    pub kind: ChangeKind,
    /// Path relative to the compared roots.
    pub path: String,
}

/// Collect the filtered, validated change list for this session.
///
/// Returns an empty list when the filtered diff is empty (nothing to
/// do). Fails with [`SyncError::UnknownChangeType`] if any surviving
/// entry carries a kind outside `{new, modified, deleted}`.
pub fn collect(
    session: &SyncSession,
    comparator: &dyn TreeComparator,
    ignore: &IgnoreSet,
) -> Result<Vec<ChangeEntry>, SyncError> {
    let raw = comparator.compare(&session.p4_path, &session.git_path)?;
    raw.into_iter()
        .filter(|change| !ignore.is_ignored(&change.path))
        .map(|change| {
            let kind = match change.kind.as_str() {
                KIND_NEW => ChangeKind::Added,
                KIND_MODIFIED => ChangeKind::Modified,
                KIND_DELETED => ChangeKind::Deleted,
                other => {
                    return Err(SyncError::UnknownChangeType {
                        kind: other.to_owned(),
                        path: change.path.clone(),
                    });
                }
            };
            Ok(ChangeEntry {
                kind,
                path: change.path,
            })
        })
        .collect()
}
