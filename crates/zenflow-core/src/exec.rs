//! Execution context for external commands.
//!
//! [`ExecutionContext`] runs every git and deploy command of a zenflow
//! invocation and carries the sticky failure flag: once a non-silent command
//! exits non-zero, every later [`run`](ExecutionContext::run) is echoed but
//! not executed, and returns empty output without an error.
//!
//! Nothing is rolled back when the flag trips. Files already rewritten in
//! process (a bumped version, a rotated changelog) stay on disk, so an
//! aborted `finish` can leave the checkout with commits that were never
//! merged or pushed. The operator is told to run the remaining commands by
//! hand.

use crate::error::Result;
use crate::log::{self, LogStyle};
use crate::tools::shell::{CommandOutput, ShellAdapter};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Options for a single command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log only to the session log; a non-zero exit does not trip the flag.
    pub silent: bool,
}

impl RunOptions {
    /// Options for queries whose exit status is expected to vary.
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Runs external commands and tracks the sticky failure flag.
pub struct ExecutionContext {
    shell: Box<dyn ShellAdapter>,
    cwd: Option<PathBuf>,
    failed: Cell<bool>,
    status: Cell<i32>,
}

impl ExecutionContext {
    /// Creates a context with a clear failure flag.
    ///
    /// # Arguments
    ///
    /// * `shell` - Adapter that actually runs the commands.
    /// * `cwd` - Directory commands run in; the process directory when `None`.
    pub fn new(shell: Box<dyn ShellAdapter>, cwd: Option<PathBuf>) -> Self {
        Self {
            shell,
            cwd,
            failed: Cell::new(false),
            status: Cell::new(0),
        }
    }

    /// Whether a command has failed during this invocation.
    pub fn failed(&self) -> bool {
        self.failed.get()
    }

    /// Exit status of the command that tripped the flag, 0 otherwise.
    pub fn status(&self) -> i32 {
        self.status.get()
    }

    /// Directory commands run in.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Runs a shell command and returns its standard output.
    ///
    /// The command is echoed first, even when the flag is already set.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ShellCommandFailed` only if the shell could not
    /// be started; the flag is tripped in that case too.
    pub fn run(&self, cmd: &str, options: RunOptions) -> Result<String> {
        if options.silent {
            log::to_file(&format!("$ {cmd}"));
        } else {
            log::say_with(&format!("$ {cmd}"), LogStyle::command());
        }
        if self.failed() {
            tracing::debug!(cmd, "skipped after earlier failure");
            return Ok(String::new());
        }

        tracing::debug!(cmd, silent = options.silent, "running command");
        let output = self
            .shell
            .run(cmd, self.cwd.as_deref())
            .inspect_err(|_| self.trip(-1))?;
        self.check(&output, options);
        Ok(output.stdout)
    }

    /// Runs a command attached to the terminal, honouring the flag.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ShellCommandFailed` if the shell could not be
    /// started.
    pub fn run_streaming(&self, cmd: &str) -> Result<()> {
        log::say_with(&format!("$ {cmd}"), LogStyle::command());
        if self.failed() {
            return Ok(());
        }

        tracing::debug!(cmd, "running interactive command");
        let output = self
            .shell
            .run_streaming(cmd, self.cwd.as_deref())
            .inspect_err(|_| self.trip(-1))?;
        self.check(&output, RunOptions::default());
        Ok(())
    }

    fn check(&self, output: &CommandOutput, options: RunOptions) {
        let stdout = output.stdout.trim();
        let stderr = output.stderr.trim();
        if !output.stdout.is_empty() {
            log::to_file(output.stdout.trim_end());
        }
        if !stderr.is_empty() {
            log::to_file(stderr);
        }
        if options.silent {
            return;
        }

        if !stdout.is_empty() {
            println!("{stdout}");
        }
        if !stderr.is_empty() {
            eprintln!("{stderr}");
        }
        if !output.success() {
            log::error("Process aborted");
            log::say_with(
                &format!("Exit status: {}", output.exit_code),
                LogStyle::error().indented(),
            );
            log::error("You may need to run any following commands manually...");
            self.trip(output.exit_code);
        }
    }

    fn trip(&self, status: i32) {
        tracing::warn!(status, "command failed; remaining commands will be skipped");
        self.failed.set(true);
        self.status.set(status);
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("shell", &"Box<dyn ShellAdapter>")
            .field("cwd", &self.cwd)
            .field("failed", &self.failed.get())
            .field("status", &self.status.get())
            .finish()
    }
}

/// Escapes text for use inside a single-quoted shell argument.
///
/// # Examples
///
/// ```
/// use zenflow_core::exec::shell_escape_for_single_quoting;
///
/// assert_eq!(shell_escape_for_single_quoting("it's"), r"it'\''s");
/// ```
pub fn shell_escape_for_single_quoting(text: &str) -> String {
    text.replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::shell_mock::MockShellAdapter;

    fn context(shell: &MockShellAdapter) -> ExecutionContext {
        ExecutionContext::new(Box::new(shell.clone()), Some(PathBuf::from("/repo")))
    }

    #[test]
    fn test_run_returns_stdout_and_uses_cwd() {
        let shell = MockShellAdapter::with_success();
        shell.set_output("git branch", CommandOutput::ok("* master\n"));
        let exec = context(&shell);

        assert_eq!(exec.run("git branch", RunOptions::default()).unwrap(), "* master\n");
        assert_eq!(shell.history()[0].1, Some(PathBuf::from("/repo")));
        assert!(!exec.failed());
        assert_eq!(exec.status(), 0);
    }

    #[test]
    fn test_failure_short_circuits_later_commands() {
        let shell = MockShellAdapter::with_success();
        shell.fail_on("git pull", 1);
        let exec = context(&shell);

        exec.run("git pull", RunOptions::default()).unwrap();
        assert!(exec.failed());
        assert_eq!(exec.status(), 1);

        let output = exec.run("git push origin master", RunOptions::default()).unwrap();
        assert!(output.is_empty());
        assert_eq!(shell.commands(), vec!["git pull".to_string()]);
    }

    #[test]
    fn test_silent_failure_does_not_trip_flag() {
        let shell = MockShellAdapter::with_success();
        shell.fail_on("git branch | grep feature", 1);
        let exec = context(&shell);

        exec.run("git branch | grep feature", RunOptions::silent()).unwrap();
        assert!(!exec.failed());

        exec.run("git status", RunOptions::default()).unwrap();
        assert_eq!(shell.command_count("git status"), 1);
    }

    #[test]
    fn test_spawn_error_trips_flag() {
        let shell = MockShellAdapter::new();
        let exec = context(&shell);

        assert!(exec.run("git status", RunOptions::default()).is_err());
        assert!(exec.failed());
        assert!(exec.run("git status", RunOptions::default()).unwrap().is_empty());
        assert_eq!(shell.commands().len(), 1);
    }

    #[test]
    fn test_streaming_honours_flag() {
        let shell = MockShellAdapter::with_success();
        shell.fail_on("git difftool master", 2);
        let exec = context(&shell);

        exec.run_streaming("git difftool master").unwrap();
        assert_eq!(exec.status(), 2);
        exec.run_streaming("git difftool master").unwrap();
        assert_eq!(shell.command_count("git difftool master"), 1);
    }

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape_for_single_quoting("plain"), "plain");
        assert_eq!(
            shell_escape_for_single_quoting("Fix 'quoted' text"),
            r"Fix '\''quoted'\'' text"
        );
    }
}
