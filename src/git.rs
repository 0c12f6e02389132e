//! The source-VCS boundary.
//!
//! [`SourceRepo`] is the only way the engine talks to git. The trait is
//! object-safe so the driver and the snapshot manager can be exercised
//! against a test double. [`GitCli`] is the real implementation, shelling
//! out to `git` in the source root. These operations always execute for
//! real — simulate mode only applies to the Perforce side.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::SyncError;

/// Git operations the sync engine depends on.
pub trait SourceRepo {
    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String, SyncError>;

    /// Fetch remote state.
    fn fetch(&self) -> Result<(), SyncError>;

    /// Create and check out `name` based on `origin/<from>`.
    fn create_branch(&self, name: &str, from: &str) -> Result<(), SyncError>;

    /// Check out an existing branch.
    fn checkout(&self, branch: &str) -> Result<(), SyncError>;

    /// Force-delete a local branch.
    fn delete_branch(&self, name: &str) -> Result<(), SyncError>;

    /// One-line summary of the head commit.
    fn head_summary(&self) -> Result<String, SyncError>;
}

/// `SourceRepo` backed by the `git` command-line tool.
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run a git subcommand in the source root, returning trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String, SyncError> {
        debug!(?args, "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
        } else {
            Err(SyncError::GitCommand {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }
}

impl SourceRepo for GitCli {
    fn current_branch(&self) -> Result<String, SyncError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn fetch(&self) -> Result<(), SyncError> {
        self.run(&["fetch"]).map(drop)
    }

    fn create_branch(&self, name: &str, from: &str) -> Result<(), SyncError> {
        let base = format!("origin/{from}");
        self.run(&["checkout", "-b", name, &base]).map(drop)
    }

    fn checkout(&self, branch: &str) -> Result<(), SyncError> {
        self.run(&["checkout", branch]).map(drop)
    }

    fn delete_branch(&self, name: &str) -> Result<(), SyncError> {
        self.run(&["branch", "-D", name]).map(drop)
    }

    fn head_summary(&self) -> Result<String, SyncError> {
        let full = self.run(&["show", "-s", "--pretty=oneline", "HEAD"])?;
        Ok(full.lines().next().unwrap_or_default().to_owned())
    }
}
