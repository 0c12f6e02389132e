//! Snapshot branch lifecycle.
//!
//! The diff step needs a stable point-in-time view of the source tree.
//! [`enter`] captures the current branch and checks out a throwaway
//! branch named after the session timestamp, based on the remote branch.
//! [`exit`] restores the captured branch and deletes the throwaway one.
//! Exit is invoked exactly once per run from every exit path — success,
//! no-op, and every abort — and its own failures degrade to a warning:
//! the snapshot branch is disposable and a human can remove it.

use tracing::warn;

use crate::error::SyncError;
use crate::git::SourceRepo;
use crate::session::SyncSession;

/// Capture the current branch, then fetch and check out the snapshot
/// branch based on `origin/<branch>`.
pub fn enter(git: &dyn SourceRepo, session: &mut SyncSession) -> Result<(), SyncError> {
    session.current_branch = Some(git.current_branch()?);

    let snapshot = session.snapshot_branch();
    println!();
    println!("Preparing for sync.");
    println!(
        "This will create a branch named {snapshot} from origin/{}; it is deleted after the sync.",
        session.branch
    );

    git.fetch()
        .and_then(|()| git.create_branch(&snapshot, &session.branch))
        .map_err(|e| SyncError::SnapshotCheckout {
            branch: session.branch.clone(),
            detail: e.to_string(),
        })
}

/// Restore the prior branch and delete the snapshot branch.
///
/// Never fails: a restore/delete problem is reported as a warning with
/// manual-cleanup instructions and the completion line is printed
/// regardless. If no prior branch was captured (the very first git query
/// failed), there is nothing to restore and the teardown is a no-op.
pub fn exit(git: &dyn SourceRepo, session: &SyncSession) {
    let result = match session.current_branch.as_deref() {
        Some(previous) => git
            .checkout(previous)
            .and_then(|()| git.delete_branch(&session.snapshot_branch())),
        None => Ok(()),
    };

    println!();
    if let Err(e) = result {
        warn!(error = %e, "snapshot teardown failed");
        println!("Could not delete the temp branch. Please delete it manually later.");
    }
    println!("Sync process completed. Please follow the logs to trace any discrepancies.");
}
