//! The replay engine.
//!
//! Applies the collected change list against the Perforce workspace,
//! strictly in collector order: a later entry may rely on a directory a
//! previous entry created. Each entry gets one `<KIND> in Git: <path>`
//! log line; each underlying command is logged by the [`Runner`], which
//! also decides whether anything actually executes.
//!
//! Per-kind operation sequences:
//! - Added: recursive copy, then one bulk `p4 add -f` over every file.
//!   The file list is enumerated from the source tree, so it is
//!   identical in simulate mode where nothing has been copied yet.
//! - Modified: `p4 edit`, then single-file copy over the target.
//! - Deleted: one `p4 delete` per descendant file, then recursive
//!   removal of the target path (commit mode only, tolerant of a path
//!   that is already gone).

use std::path::Path;

use crate::diff::ChangeKind;
use crate::error::SyncError;
use crate::exec::{CommandRequest, RunMode, Runner};
use crate::fsutil;
use crate::session::{SyncSession, strip_leading_slash};

/// Replay every collected change against the target workspace.
pub fn apply(session: &SyncSession, runner: &mut Runner<'_>) -> Result<(), SyncError> {
    for entry in &session.changes {
        let rel = strip_leading_slash(&entry.path);
        println!("{} in Git: {rel}", entry.kind);
        match entry.kind {
            ChangeKind::Added => apply_added(session, rel, runner)?,
            ChangeKind::Modified => apply_modified(session, rel, runner)?,
            ChangeKind::Deleted => apply_deleted(session, rel, runner)?,
        }
    }
    Ok(())
}

fn apply_added(
    session: &SyncSession,
    rel: &str,
    runner: &mut Runner<'_>,
) -> Result<(), SyncError> {
    let source = session.git_path.join(rel);
    let target = session.p4_path.join(rel);
    runner.run(&CommandRequest::new(
        "cp",
        ["-r".to_owned(), path_arg(&source), path_arg(&target)],
        &session.p4_path,
    ))?;

    let mut args = vec!["add".to_owned(), "-f".to_owned()];
    for file in fsutil::walk_files(&source)? {
        let rel_file = file.strip_prefix(&session.git_path).unwrap_or(&file);
        args.push(path_arg(&session.p4_path.join(rel_file)));
    }
    if args.len() == 2 {
        // Empty directory: nothing for the target VCS to track.
        return Ok(());
    }
    runner.run(&CommandRequest::new("p4", args, &session.p4_path))
}

fn apply_modified(
    session: &SyncSession,
    rel: &str,
    runner: &mut Runner<'_>,
) -> Result<(), SyncError> {
    let source = session.git_path.join(rel);
    let target = session.p4_path.join(rel);
    runner.run(&CommandRequest::new(
        "p4",
        ["edit".to_owned(), path_arg(&target)],
        &session.p4_path,
    ))?;
    runner.run(&CommandRequest::new(
        "cp",
        [path_arg(&source), path_arg(&target)],
        &session.p4_path,
    ))
}

fn apply_deleted(
    session: &SyncSession,
    rel: &str,
    runner: &mut Runner<'_>,
) -> Result<(), SyncError> {
    let target = session.p4_path.join(rel);
    for file in fsutil::walk_files(&target)? {
        if file != target {
            println!("DELETED in Git (dir contents): {}", file.display());
        }
        runner.run(&CommandRequest::new(
            "p4",
            ["delete".to_owned(), path_arg(&file)],
            &session.p4_path,
        ))?;
    }
    if runner.mode() == RunMode::Commit {
        fsutil::remove_recursive(&target)?;
    }
    Ok(())
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeEntry;
    use crate::exec::RecordingExecutor;

    fn session_with(
        changes: Vec<ChangeEntry>,
    ) -> (tempfile::TempDir, tempfile::TempDir, SyncSession) {
        let git = tempfile::tempdir().unwrap();
        let p4 = tempfile::tempdir().unwrap();
        let mut session = SyncSession::new(git.path(), p4.path(), "master").unwrap();
        session.changes = changes;
        (git, p4, session)
    }

    fn entry(kind: ChangeKind, path: &str) -> ChangeEntry {
        ChangeEntry {
            kind,
            path: path.to_owned(),
        }
    }

    #[test]
    fn added_file_is_copy_then_one_bulk_add() {
        let (git, p4, session) = session_with(vec![entry(ChangeKind::Added, "a.txt")]);
        std::fs::write(git.path().join("a.txt"), "hello").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();

        assert_eq!(recording.calls.len(), 2);
        assert_eq!(recording.calls[0].program, "cp");
        assert_eq!(recording.calls[0].args[0], "-r");
        assert_eq!(recording.calls[1].program, "p4");
        assert_eq!(recording.calls[1].args[0], "add");
        assert_eq!(recording.calls[1].args[1], "-f");
        assert!(recording.calls[1].args[2].ends_with("a.txt"));
        assert!(recording.calls[1].args[2].starts_with(p4.path().to_str().unwrap()));
    }

    #[test]
    fn added_directory_bulk_adds_every_file() {
        let (git, _p4, session) = session_with(vec![entry(ChangeKind::Added, "newdir")]);
        std::fs::create_dir_all(git.path().join("newdir/sub")).unwrap();
        std::fs::write(git.path().join("newdir/one.txt"), "1").unwrap();
        std::fs::write(git.path().join("newdir/sub/two.txt"), "2").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();

        assert_eq!(recording.calls.len(), 2);
        let add = &recording.calls[1];
        assert_eq!(add.args.len(), 4); // add, -f, two files
        assert!(add.args[2].ends_with("newdir/one.txt"));
        assert!(add.args[3].ends_with("newdir/sub/two.txt"));
    }

    #[test]
    fn modified_file_is_edit_then_copy() {
        let (git, p4, session) = session_with(vec![entry(ChangeKind::Modified, "b.txt")]);
        std::fs::write(git.path().join("b.txt"), "v2").unwrap();
        std::fs::write(p4.path().join("b.txt"), "v1").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();

        assert_eq!(recording.calls.len(), 2);
        assert_eq!(recording.calls[0].program, "p4");
        assert_eq!(recording.calls[0].args[0], "edit");
        assert_eq!(recording.calls[1].program, "cp");
        assert_eq!(recording.calls[1].args.len(), 2); // single-file copy, no -r
    }

    #[test]
    fn deleted_directory_deletes_each_file_then_removes_the_tree() {
        let (_git, p4, session) = session_with(vec![entry(ChangeKind::Deleted, "gone")]);
        std::fs::create_dir_all(p4.path().join("gone")).unwrap();
        std::fs::write(p4.path().join("gone/a.txt"), "a").unwrap();
        std::fs::write(p4.path().join("gone/b.txt"), "b").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();

        assert_eq!(recording.calls.len(), 2);
        for call in &recording.calls {
            assert_eq!(call.program, "p4");
            assert_eq!(call.args[0], "delete");
        }
        assert!(recording.calls[0].args[1].ends_with("gone/a.txt"));
        assert!(recording.calls[1].args[1].ends_with("gone/b.txt"));
        assert!(!p4.path().join("gone").exists());
    }

    #[test]
    fn deleted_missing_path_is_tolerated() {
        let (_git, _p4, session) = session_with(vec![entry(ChangeKind::Deleted, "absent")]);
        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();
        assert!(recording.calls.is_empty());
    }

    #[test]
    fn simulate_mutates_nothing() {
        let (git, p4, session) = session_with(vec![
            entry(ChangeKind::Added, "a.txt"),
            entry(ChangeKind::Deleted, "gone"),
        ]);
        std::fs::write(git.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir_all(p4.path().join("gone")).unwrap();
        std::fs::write(p4.path().join("gone/x.txt"), "x").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Simulate, &mut recording);
        apply(&session, &mut runner).unwrap();

        assert!(recording.calls.is_empty());
        assert!(!p4.path().join("a.txt").exists());
        assert!(p4.path().join("gone/x.txt").exists());
    }

    #[test]
    fn leading_slash_is_stripped_before_joining() {
        let (git, p4, session) = session_with(vec![entry(ChangeKind::Added, "/a.txt")]);
        std::fs::write(git.path().join("a.txt"), "hello").unwrap();

        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        apply(&session, &mut runner).unwrap();

        let copy = &recording.calls[0];
        assert_eq!(copy.args[1], git.path().join("a.txt").display().to_string());
        assert_eq!(copy.args[2], p4.path().join("a.txt").display().to_string());
    }

    #[test]
    fn first_command_failure_aborts_the_replay() {
        let (git, _p4, session) = session_with(vec![
            entry(ChangeKind::Added, "a.txt"),
            entry(ChangeKind::Added, "b.txt"),
        ]);
        std::fs::write(git.path().join("a.txt"), "a").unwrap();
        std::fs::write(git.path().join("b.txt"), "b").unwrap();

        let mut recording = RecordingExecutor::failing_from(1);
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        let err = apply(&session, &mut runner).unwrap_err();
        assert!(matches!(err, SyncError::CommandFailed { .. }));
        // cp for a.txt succeeded, add for a.txt failed, b.txt never started.
        assert_eq!(recording.calls.len(), 2);
    }
}
