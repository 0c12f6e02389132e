use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use git_p4_sync::compare::WalkComparator;
use git_p4_sync::config::SyncConfig;
use git_p4_sync::exec::SystemExecutor;
use git_p4_sync::git::GitCli;
use git_p4_sync::run;
use git_p4_sync::session::{SyncSession, normalize_root};
use git_p4_sync::telemetry;

/// Replay git working-tree changes into a Perforce client workspace
///
/// The sync takes a point-in-time snapshot of the git side on a
/// throwaway branch (temp_sync_branch_<timestamp>), diffs the two
/// trees, and replays every difference as p4 add/edit/delete
/// operations plus filesystem copies. The snapshot branch is deleted
/// when the run ends, whether it succeeded or not.
///
/// MODES:
///   (default)    collect and count the changes; touch nothing
///   --show       additionally print the change list
///   --simulate   log every Perforce-side command without executing it
///   --submit     apply the changes and submit them as one changelist
///
/// EXAMPLES:
///   git-p4-sync --p4-path ~/p4/client --branch master --show --simulate
///   git-p4-sync --git-path ~/src/app --p4-path ~/p4/app --submit
#[derive(Parser)]
#[command(name = "git-p4-sync")]
#[command(version, about)]
struct Cli {
    /// Path to the git working tree (source)
    #[arg(long, default_value = ".")]
    git_path: PathBuf,

    /// Path to the Perforce client workspace (target)
    #[arg(long)]
    p4_path: PathBuf,

    /// Remote branch to sync from, resolved as origin/<branch>
    /// (default: the configured branch, else "master")
    #[arg(long)]
    branch: Option<String>,

    /// Print the change list before applying
    #[arg(long)]
    show: bool,

    /// Log every Perforce-side command without executing anything
    #[arg(long)]
    simulate: bool,

    /// Apply the changes and submit them as a single changelist
    #[arg(long)]
    submit: bool,

    /// Extra ignore patterns: a single pattern, or a ':'- or
    /// ','-delimited list (regular expressions, matched anywhere in
    /// the path)
    #[arg(long)]
    ignore: Option<String>,
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    // Path validation happens before the snapshot exists, so a bad path
    // exits without owing any cleanup.
    let git_root = normalize_root(&cli.git_path)?;
    let config = SyncConfig::load(&git_root)?;
    let branch = cli.branch.unwrap_or(config.repo.branch);

    let mut session = SyncSession::new(&cli.git_path, &cli.p4_path, branch)?;
    session.show = cli.show;
    session.simulate = cli.simulate;
    session.submit = cli.submit;
    session.ignore = cli.ignore;
    session.extra_ignore = config.ignore.patterns;

    let git = GitCli::new(session.git_path.clone());
    let mut executor = SystemExecutor;
    run::execute(&mut session, &git, &WalkComparator, &mut executor)?;
    Ok(())
}
