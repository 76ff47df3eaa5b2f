//! Shell adapter trait and operations.
//!
//! This module defines the `ShellAdapter` trait for executing shell commands.
//! Commands are full shell lines (pipes, `&&`, `||`) because git queries such
//! as `git branch | grep feature` rely on the shell.

use crate::error::Result;
use std::path::Path;

/// Shell command output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code from the command (0 indicates success).
    pub exit_code: i32,

    /// Standard output from the command.
    pub stdout: String,

    /// Standard error output from the command.
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output carrying `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Checks if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Shell adapter trait.
///
/// Implementations can execute real commands or provide mocked behavior for
/// testing. A non-zero exit code is not an error at this level; callers
/// inspect [`CommandOutput::success`].
pub trait ShellAdapter: Send + Sync {
    /// Executes a shell command and captures its output.
    ///
    /// # Arguments
    ///
    /// * `cmd` - Command line to execute.
    /// * `cwd` - Working directory for the command (optional).
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ShellCommandFailed` if the shell cannot be
    /// started.
    fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput>;

    /// Executes a shell command attached to the terminal.
    ///
    /// Used for interactive tools such as `git difftool`; stdout and stderr
    /// are not captured.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ShellCommandFailed` if the shell cannot be
    /// started.
    fn run_streaming(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput>;
}
