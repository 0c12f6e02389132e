//! Error types for the sync engine.
//!
//! Defines [`SyncError`], the unified error type for all engine operations.
//! Error messages are designed to be operator-friendly: each variant includes
//! a clear description of what went wrong and actionable guidance on how to
//! fix it. Cleanup failures are deliberately not represented here — the
//! snapshot branch is disposable, so teardown problems degrade to warnings
//! instead of errors.

use std::fmt;
use std::path::PathBuf;

/// Unified error type for sync engine operations.
///
/// Every fatal path in the engine surfaces as one of these variants and
/// propagates to the binary, which performs cleanup and exits non-zero.
/// No engine component terminates the process directly.
#[derive(Debug)]
pub enum SyncError {
    /// A configured root path is missing or not a directory.
    PathNotDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The snapshot branch could not be created from the remote branch.
    SnapshotCheckout {
        /// The branch the snapshot was based on (`origin/<branch>`).
        branch: String,
        /// Underlying git failure.
        detail: String,
    },

    /// The tree comparator reported a change kind outside the recognized set.
    UnknownChangeType {
        /// The unrecognized kind tag.
        kind: String,
        /// The path the kind was reported for.
        path: String,
    },

    /// An external command returned a non-success status in commit mode.
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// The process exit code, if the process exited normally.
        exit_code: Option<i32>,
    },

    /// A git query or branch operation failed.
    GitCommand {
        /// The git command that was run (e.g. `"git fetch"`).
        command: String,
        /// Captured stderr from git.
        stderr: String,
    },

    /// An ignore pattern did not compile as a regular expression.
    InvalidIgnorePattern {
        /// The pattern source text.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// An I/O error occurred during a sync operation.
    Io(std::io::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotDirectory { path } => {
                write!(f, "{} must exist and be a directory.", path.display())
            }
            Self::SnapshotCheckout { branch, detail } => {
                write!(
                    f,
                    "cannot checkout a snapshot branch from 'origin/{branch}': {detail}\n  Verify that the git path and branch name are correct."
                )
            }
            Self::UnknownChangeType { kind, path } => {
                write!(
                    f,
                    "unknown change type '{kind}' for '{path}'. Task aborted."
                )
            }
            Self::CommandFailed { command, exit_code } => {
                write!(f, "command failed")?;
                if let Some(code) = exit_code {
                    write!(f, " (exit code {code})")?;
                }
                write!(f, ": {command}")
            }
            Self::GitCommand { command, stderr } => {
                write!(f, "git command failed: {command}")?;
                if !stderr.is_empty() {
                    write!(f, "\n  stderr: {stderr}")?;
                }
                Ok(())
            }
            Self::InvalidIgnorePattern { pattern, reason } => {
                write!(f, "invalid ignore pattern '{pattern}': {reason}")
            }
            Self::Config { path, detail } => {
                write!(
                    f,
                    "configuration error in '{}': {}\n  To fix: edit the config file and correct the issue.",
                    path.display(),
                    detail
                )
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
