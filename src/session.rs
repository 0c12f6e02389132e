//! The sync session — the root aggregate for one run.
//!
//! A [`SyncSession`] is constructed once by the caller and passed by
//! reference through every engine component. There is no process-wide
//! state: everything a run needs (roots, branch, flags, the collected
//! change list, the branch to restore on exit) lives here.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;

use crate::diff::ChangeEntry;
use crate::error::SyncError;

/// Prefix of the throwaway branch created for each run. The session
/// timestamp is appended so concurrent runs on different clocks never
/// collide on a branch name.
pub const SNAPSHOT_BRANCH_PREFIX: &str = "temp_sync_branch_";

/// State for a single sync run.
///
/// Both roots are validated absolute directories by construction. The
/// change list starts empty, is populated once by the diff collector,
/// and is read-only afterward.
#[derive(Debug)]
pub struct SyncSession {
    /// Absolute path to the git working tree (source).
    pub git_path: PathBuf,
    /// Absolute path to the Perforce client workspace (target).
    pub p4_path: PathBuf,
    /// Remote branch the snapshot is taken from (`origin/<branch>`).
    pub branch: String,
    /// Session timestamp (seconds since the Unix epoch). Names the
    /// snapshot branch and tags the changelist description.
    pub timestamp: i64,
    /// Print the change list before applying.
    pub show: bool,
    /// Log every Perforce-side command without executing it.
    pub simulate: bool,
    /// Apply the changes and submit them as one changelist.
    pub submit: bool,
    /// Raw ignore token from the command line (single pattern, or a
    /// `:`/`,`-delimited list).
    pub ignore: Option<String>,
    /// Extra ignore patterns from the configuration file.
    pub extra_ignore: Vec<String>,
    /// Branch to restore when the snapshot is torn down. Captured by
    /// the snapshot manager on entry.
    pub current_branch: Option<String>,
    /// The collected, validated change list.
    pub changes: Vec<ChangeEntry>,
}

impl SyncSession {
    /// Create a session for the given roots and branch.
    ///
    /// Both paths are normalized to absolute form and must exist as
    /// directories; anything else is a precondition error, raised before
    /// any snapshot exists (so no cleanup is owed).
    pub fn new(
        git_path: &Path,
        p4_path: &Path,
        branch: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));
        Ok(Self {
            git_path: normalize_root(git_path)?,
            p4_path: normalize_root(p4_path)?,
            branch: branch.into(),
            timestamp,
            show: false,
            simulate: false,
            submit: false,
            ignore: None,
            extra_ignore: Vec::new(),
            current_branch: None,
            changes: Vec::new(),
        })
    }

    /// Name of the throwaway snapshot branch for this run.
    #[must_use]
    pub fn snapshot_branch(&self) -> String {
        format!("{SNAPSHOT_BRANCH_PREFIX}{}", self.timestamp)
    }

    /// The session timestamp rendered as a human-readable UTC instant,
    /// used in the changelist description.
    #[must_use]
    pub fn rendered_timestamp(&self) -> String {
        DateTime::from_timestamp(self.timestamp, 0).map_or_else(
            || self.timestamp.to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
    }
}

/// Normalize a root path to absolute form and require it to be an
/// existing directory.
pub fn normalize_root(path: &Path) -> Result<PathBuf, SyncError> {
    let abs = std::path::absolute(path)?;
    if abs.is_dir() {
        Ok(abs)
    } else {
        Err(SyncError::PathNotDirectory { path: abs })
    }
}

/// Strip leading path separators from a comparator-relative path so it
/// can be joined onto either root.
#[must_use]
pub fn strip_leading_slash(path: &str) -> &str {
    path.trim_start_matches(['/', '\\'])
}
