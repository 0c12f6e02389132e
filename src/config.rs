//! Tool configuration (`.gitp4sync.toml`).
//!
//! Read from the git root before the snapshot is taken — this is tool
//! configuration, not branch content. Missing fields use defaults; a
//! missing file means all defaults (no error). Command-line flags
//! override anything configured here.

use std::path::Path;

use serde::Deserialize;

use crate::error::SyncError;

/// Configuration file name, looked up at the git root.
pub const CONFIG_FILE: &str = ".gitp4sync.toml";

/// Top-level tool configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Repository-level settings.
    #[serde(default)]
    pub repo: RepoConfig,

    /// Ignore settings.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Repository-level settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// The remote branch to sync from when `--branch` is not given
    /// (default: `"master"`).
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
        }
    }
}

fn default_branch() -> String {
    "master".to_owned()
}

/// Ignore settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Extra patterns appended to the ignore set, after the required
    /// `.git` entry and before any command-line patterns.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SyncConfig {
    /// Load configuration from `<git_root>/.gitp4sync.toml`.
    pub fn load(git_root: &Path) -> Result<Self, SyncError> {
        let path = git_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| SyncError::Config {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| SyncError::Config {
            path,
            detail: e.to_string(),
        })
    }
}
