//! Path exclusion for the diff step.
//!
//! An [`IgnoreSet`] is the union of a fixed `.git` entry (Perforce never
//! needs the git metadata directory), configured patterns, command-line
//! patterns, and the lines of the source tree's `.gitignore`. Patterns
//! are regular expressions matched anywhere within a candidate path (not
//! anchored), compiled once when the set is built. Duplicates are kept;
//! the union semantics make deduplication pointless.
//!
//! Known limitation: only the top-level `.gitignore` is consulted, and
//! only its `*` glob is translated (to `.*`). Nested `.gitignore` files
//! are not handled.

use std::path::Path;

use regex::Regex;

use crate::error::SyncError;

/// Ignore file convention at the git root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// The always-present pattern for the source VCS metadata directory.
const REQUIRED_PATTERN: &str = ".git";

/// A frozen set of compiled exclusion patterns.
#[derive(Debug)]
pub struct IgnoreSet {
    patterns: Vec<Regex>,
}

impl IgnoreSet {
    /// Build the pattern set for one run.
    ///
    /// Sources, in order: the fixed `.git` entry; `extra` (from the
    /// config file); the command-line `token`, split on `:` if it
    /// contains one, else on `,` if it contains one, else taken whole;
    /// the `.gitignore` at `git_root`, with blank lines and `#` comments
    /// dropped and `*` rewritten to `.*`. A missing `.gitignore` is not
    /// an error. Called after snapshot entry, so the `.gitignore` read
    /// here is the snapshot branch's version.
    pub fn build(
        git_root: &Path,
        token: Option<&str>,
        extra: &[String],
    ) -> Result<Self, SyncError> {
        let mut sources = vec![REQUIRED_PATTERN.to_owned()];
        sources.extend(extra.iter().cloned());

        if let Some(token) = token {
            if token.contains(':') {
                sources.extend(token.split(':').map(str::to_owned));
            } else if token.contains(',') {
                sources.extend(token.split(',').map(str::to_owned));
            } else {
                sources.push(token.to_owned());
            }
        }

        if let Ok(text) = std::fs::read_to_string(git_root.join(GITIGNORE_FILE)) {
            sources.extend(
                text.lines()
                    .filter(|line| !line.is_empty() && !line.trim_start().starts_with('#'))
                    .map(|line| line.replace('*', ".*")),
            );
        }

        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            let regex = Regex::new(&source).map_err(|e| SyncError::InvalidIgnorePattern {
                pattern: source.clone(),
                reason: e.to_string(),
            })?;
            patterns.push(regex);
        }
        Ok(Self { patterns })
    }

    /// Whether any pattern matches anywhere within `path`.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(path))
    }

    /// Number of patterns in the set (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false: the fixed `.git` entry is unconditional.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
