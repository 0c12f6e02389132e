//! External command execution.
//!
//! Commands are structured requests (program + argument list + working
//! directory), never pre-joined shell strings, so no quoting is owed to a
//! shell. The [`Runner`] owns the `{simulate, commit}` distinction: it
//! logs one line per command and, in simulate mode, treats every command
//! as having trivially succeeded without touching the filesystem or the
//! target VCS.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::SyncError;

/// How replay and submission treat external commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Log each command without executing it.
    Simulate,
    /// Execute each command; a non-success status is fatal.
    Commit,
}

/// One external command invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRequest {
    /// Program name.
    pub program: String,
    /// Arguments, unjoined and unquoted.
    pub args: Vec<String>,
    /// Working directory for the invocation.
    pub cwd: PathBuf,
}

impl CommandRequest {
    /// Build a request from any argument collection.
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_owned(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_owned(),
        }
    }

    /// Render the request for log output. Arguments containing
    /// whitespace are quoted for readability only — execution never goes
    /// through a shell.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.chars().any(char::is_whitespace) {
                line.push('\'');
                line.push_str(arg);
                line.push('\'');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Executes structured command requests. Object-safe so the engine can
/// be driven by a recording double in tests.
pub trait Executor {
    /// Run the request to completion, failing on a non-success status.
    fn execute(&mut self, request: &CommandRequest) -> Result<(), SyncError>;
}

/// The real executor: blocks on the subprocess until it exits.
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&mut self, request: &CommandRequest) -> Result<(), SyncError> {
        // Single choke point for all external commands; a future timeout
        // wrapper goes here.
        let status = Command::new(&request.program)
            .args(&request.args)
            .current_dir(&request.cwd)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(SyncError::CommandFailed {
                command: request.render(),
                exit_code: status.code(),
            })
        }
    }
}

/// Mode-aware command runner used by replay and submission.
pub struct Runner<'a> {
    mode: RunMode,
    executor: &'a mut dyn Executor,
}

impl<'a> Runner<'a> {
    pub fn new(mode: RunMode, executor: &'a mut dyn Executor) -> Self {
        Self { mode, executor }
    }

    /// The mode this runner was created with.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Log the command, then execute it unless simulating.
    pub fn run(&mut self, request: &CommandRequest) -> Result<(), SyncError> {
        match self.mode {
            RunMode::Simulate => {
                println!("  simulation: {}", request.render());
                Ok(())
            }
            RunMode::Commit => {
                println!("  {}", request.render());
                debug!(command = %request.render(), "executing");
                self.executor.execute(request)
            }
        }
    }
}

/// Records every executed request and succeeds, optionally failing from
/// a given call index onward. Shared by unit tests across the engine.
#[cfg(test)]
pub(crate) struct RecordingExecutor {
    pub calls: Vec<CommandRequest>,
    pub fail_from: Option<usize>,
}

#[cfg(test)]
impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_from: None,
        }
    }

    pub fn failing_from(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_from: Some(index),
        }
    }
}

#[cfg(test)]
impl Executor for RecordingExecutor {
    fn execute(&mut self, request: &CommandRequest) -> Result<(), SyncError> {
        let index = self.calls.len();
        self.calls.push(request.clone());
        match self.fail_from {
            Some(from) if index >= from => Err(SyncError::CommandFailed {
                command: request.render(),
                exit_code: Some(1),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(args: &[&str]) -> CommandRequest {
        CommandRequest::new("p4", args.iter().copied(), Path::new("/tmp"))
    }

    #[test]
    fn render_joins_program_and_args() {
        assert_eq!(request(&["edit", "b.txt"]).render(), "p4 edit b.txt");
    }

    #[test]
    fn render_quotes_whitespace_args() {
        assert_eq!(
            request(&["submit", "-d", "two words"]).render(),
            "p4 submit -d 'two words'"
        );
    }

    #[test]
    fn simulate_never_reaches_the_executor() {
        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Simulate, &mut recording);
        runner.run(&request(&["edit", "b.txt"])).unwrap();
        runner.run(&request(&["delete", "c.txt"])).unwrap();
        assert!(recording.calls.is_empty());
    }

    #[test]
    fn commit_executes_in_order() {
        let mut recording = RecordingExecutor::new();
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        runner.run(&request(&["edit", "b.txt"])).unwrap();
        runner.run(&request(&["delete", "c.txt"])).unwrap();
        assert_eq!(recording.calls.len(), 2);
        assert_eq!(recording.calls[0].args, vec!["edit", "b.txt"]);
        assert_eq!(recording.calls[1].args, vec!["delete", "c.txt"]);
    }

    #[test]
    fn commit_propagates_failure() {
        let mut recording = RecordingExecutor::failing_from(0);
        let mut runner = Runner::new(RunMode::Commit, &mut recording);
        let err = runner.run(&request(&["edit", "b.txt"])).unwrap_err();
        assert!(matches!(err, SyncError::CommandFailed { .. }));
    }

    #[test]
    fn system_executor_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let request = CommandRequest::new("false", std::iter::empty::<String>(), dir.path());
        let err = SystemExecutor.execute(&request).unwrap_err();
        match err {
            SyncError::CommandFailed { exit_code, .. } => assert_eq!(exit_code, Some(1)),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn system_executor_runs_real_commands() {
        let dir = tempfile::tempdir().unwrap();
        let request = CommandRequest::new("true", std::iter::empty::<String>(), dir.path());
        SystemExecutor.execute(&request).unwrap();
    }
}
