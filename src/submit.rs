//! Changelist submission.
//!
//! Runs after a successful replay, in the same mode: the description is
//! the snapshot head's one-line summary plus the rendered session
//! timestamp, passed through [`quote_description`] so embedded single
//! quotes survive any later shell-quoting of the changelist text.

use crate::error::SyncError;
use crate::exec::{CommandRequest, Runner};
use crate::git::SourceRepo;
use crate::session::SyncSession;

/// Compose the changelist description and submit the staged changes.
pub fn submit(
    session: &SyncSession,
    git: &dyn SourceRepo,
    runner: &mut Runner<'_>,
) -> Result<(), SyncError> {
    let head = git.head_summary()?;
    let description = format!("{head} at {}", session.rendered_timestamp());

    println!();
    println!("Submitting changes to Perforce");
    runner.run(&CommandRequest::new(
        "p4",
        [
            "submit".to_owned(),
            "-d".to_owned(),
            quote_description(&description),
        ],
        &session.p4_path,
    ))
}

/// Escape embedded single quotes (`'` becomes `''`) so the description
/// is safe to re-quote in a shell context.
#[must_use]
pub fn quote_description(description: &str) -> String {
    description.replace('\'', "''")
}
