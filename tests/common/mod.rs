//! Shared helpers for git-p4-sync integration tests.
//!
//! All tests use temp directories — no side effects on the real repo.
//! Each test gets its own git repo with a local bare `origin` remote via
//! `setup_repo_with_remote()`, because the sync always snapshots from
//! `origin/<branch>`.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run a git command in the given directory. Panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {}: {e}", args.join(" ")));
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "git {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Create a git repo with one pushed commit and a local bare `origin`.
///
/// Returns `(repo, remote)`. The repo is on branch `master` with
/// `README.md` committed and pushed.
pub fn setup_repo_with_remote() -> (TempDir, TempDir) {
    let remote = TempDir::new().expect("failed to create remote temp dir");
    git(remote.path(), &["init", "--bare"]);

    let repo = TempDir::new().expect("failed to create repo temp dir");
    git(repo.path(), &["init", "-b", "master"]);
    git(repo.path(), &["config", "user.email", "sync@test"]);
    git(repo.path(), &["config", "user.name", "sync"]);
    git(
        repo.path(),
        &["remote", "add", "origin", &remote.path().display().to_string()],
    );

    std::fs::write(repo.path().join("README.md"), "# test repo\n").unwrap();
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "-m", "initial commit"]);
    git(repo.path(), &["push", "-u", "origin", "master"]);

    (repo, remote)
}

/// Commit and push a file so it lands on `origin/master`.
pub fn commit_and_push(repo: &Path, rel: &str, content: &str) {
    let path = repo.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", &format!("add {rel}")]);
    git(repo, &["push", "origin", "master"]);
}

/// Create a target workspace containing the repo's tracked files
/// (everything except `.git`).
pub fn p4_dir_matching(repo: &Path) -> TempDir {
    let dir = TempDir::new().expect("failed to create p4 temp dir");
    copy_tree(repo, dir.path());
    dir
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in std::fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name();
        if name == ".git" {
            continue;
        }
        let src = entry.path();
        let dst = to.join(&name);
        if src.is_dir() {
            std::fs::create_dir_all(&dst).unwrap();
            copy_tree(&src, &dst);
        } else {
            std::fs::copy(&src, &dst).unwrap();
        }
    }
}

/// Run git-p4-sync with the given args.
pub fn sync_run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-p4-sync"))
        .args(args)
        .output()
        .expect("failed to execute git-p4-sync")
}

/// Run git-p4-sync and assert it succeeds. Returns stdout as string.
pub fn sync_ok(args: &[&str]) -> String {
    let out = sync_run(args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "git-p4-sync {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run git-p4-sync and assert it fails. Returns (stdout, stderr).
pub fn sync_fails(args: &[&str]) -> (String, String) {
    let out = sync_run(args);
    assert!(
        !out.status.success(),
        "Expected git-p4-sync {} to fail, but it succeeded.\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
    );
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
    )
}

/// Local branch names of the repo.
pub fn local_branches(repo: &Path) -> Vec<String> {
    git(repo, &["branch", "--format=%(refname:short)"])
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Name of the currently checked-out branch.
pub fn current_branch(repo: &Path) -> String {
    git(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
        .trim()
        .to_owned()
}

/// Path helper: render a `TempDir`-rooted path as a CLI argument.
pub fn arg(path: &Path) -> String {
    path.display().to_string()
}
