//! The top-level driver.
//!
//! [`execute`] walks the whole session state machine: snapshot enter →
//! diff collection → optional change listing → replay → submission →
//! snapshot exit. It is the single place that guarantees the snapshot is
//! torn down exactly once, on every path — success, empty diff, and
//! every abort variant. No component below this level terminates the
//! process; fatal conditions propagate as [`SyncError`] to the binary.

use crate::compare::TreeComparator;
use crate::diff::{self, ChangeEntry};
use crate::error::SyncError;
use crate::exec::{Executor, RunMode, Runner};
use crate::git::SourceRepo;
use crate::ignore::IgnoreSet;
use crate::replay;
use crate::session::SyncSession;
use crate::snapshot;
use crate::submit;

/// How a run ended, short of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The change list was processed (or merely listed, if neither
    /// submit nor simulate was requested).
    Completed { changes: usize },
    /// The filtered diff was empty. A legitimate result, not a failure.
    NothingToDo,
}

/// Run one sync session to completion.
pub fn execute(
    session: &mut SyncSession,
    git: &dyn SourceRepo,
    comparator: &dyn TreeComparator,
    executor: &mut dyn Executor,
) -> Result<Outcome, SyncError> {
    let result = match snapshot::enter(git, session) {
        Ok(()) => run_synced(session, git, comparator, executor),
        Err(e) => Err(e),
    };
    // The sole teardown call site. Runs even when snapshot entry failed:
    // restoring the branch we are already on is harmless, and the fetch
    // may have half-created state worth deleting.
    snapshot::exit(git, session);
    result
}

fn run_synced(
    session: &mut SyncSession,
    git: &dyn SourceRepo,
    comparator: &dyn TreeComparator,
    executor: &mut dyn Executor,
) -> Result<Outcome, SyncError> {
    // Built after snapshot entry so .gitignore reflects the snapshot
    // branch, not whatever was checked out before.
    let ignore = IgnoreSet::build(&session.git_path, session.ignore.as_deref(), &session.extra_ignore)?;

    let changes = diff::collect(session, comparator, &ignore)?;
    if changes.is_empty() {
        println!("Directories are identical. Nothing to do.");
        return Ok(Outcome::NothingToDo);
    }
    session.changes = changes;

    if session.show {
        show_changes(&session.changes);
    }
    println!();
    println!("A total of {} change(s)", session.changes.len());

    if session.submit || session.simulate {
        let mode = if session.simulate {
            RunMode::Simulate
        } else {
            RunMode::Commit
        };
        let mut runner = Runner::new(mode, executor);
        replay::apply(session, &mut runner)?;
        submit::submit(session, git, &mut runner)?;
    }

    Ok(Outcome::Completed {
        changes: session.changes.len(),
    })
}

fn show_changes(changes: &[ChangeEntry]) {
    println!();
    println!("Change List :");
    for change in changes {
        println!("{} in Git: {}", change.kind, change.path);
    }
}
