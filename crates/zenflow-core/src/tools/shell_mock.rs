//! Mock shell adapter for testing.
//!
//! The mock returns pre-programmed outputs and records every command it is
//! asked to run, so tests can assert the exact git sequence a workflow
//! issues. Helpers script the few git queries the workflows read from.

use crate::error::{Result, ZenflowError};
use crate::tools::shell::{CommandOutput, ShellAdapter};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A recorded command and the directory it ran in.
type Invocation = (String, Option<PathBuf>);

/// Scripted stand-in for git and the deploy hooks.
///
/// # Examples
///
/// ```
/// use zenflow_core::tools::shell_mock::MockShellAdapter;
/// use zenflow_core::tools::shell::ShellAdapter;
///
/// let shell = MockShellAdapter::with_success();
/// shell.checked_out("feature", "login");
///
/// let output = shell.run("git branch | grep '* feature'", None).unwrap();
/// assert_eq!(output.stdout, "* feature/login\n");
/// assert_eq!(shell.commands(), vec!["git branch | grep '* feature'".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockShellAdapter {
    scripted: Arc<Mutex<HashMap<String, CommandOutput>>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
    /// Answer for commands with no script; `None` makes them fail to spawn.
    fallback: Arc<Mutex<Option<CommandOutput>>>,
}

impl MockShellAdapter {
    /// Creates a mock with no outputs; unknown commands fail to spawn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock where every unscripted command exits 0 silently.
    pub fn with_success() -> Self {
        let shell = Self::new();
        shell.set_default_output(CommandOutput::ok(""));
        shell
    }

    /// Scripts the output of one exact command line.
    pub fn set_output(&self, cmd: &str, output: CommandOutput) {
        self.scripted.lock().unwrap().insert(cmd.to_string(), output);
    }

    /// Makes a specific command exit with `exit_code`.
    pub fn fail_on(&self, cmd: &str, exit_code: i32) {
        self.set_output(cmd, CommandOutput::failure(exit_code, "mock failure"));
    }

    /// Answers unscripted commands with `output`.
    pub fn set_default_output(&self, output: CommandOutput) {
        *self.fallback.lock().unwrap() = Some(output);
    }

    /// Pretends `{flow}/{identifier}` is the checked-out branch.
    pub fn checked_out(&self, flow: &str, identifier: &str) {
        self.set_output(
            &format!("git branch | grep '* {flow}'"),
            CommandOutput::ok(&format!("* {flow}/{identifier}\n")),
        );
    }

    /// Pretends the local branches under `flow` are `identifiers`.
    pub fn local_branches(&self, flow: &str, identifiers: &[&str]) {
        let listing: String = identifiers
            .iter()
            .map(|id| format!("  {flow}/{id}\n"))
            .collect();
        self.set_output(&format!("git branch | grep {flow}"), CommandOutput::ok(&listing));
    }

    /// Pretends `git config --get {key}` prints `value`.
    pub fn git_config(&self, key: &str, value: &str) {
        self.set_output(
            &format!("git config --get {key}"),
            CommandOutput::ok(&format!("{value}\n")),
        );
    }

    /// Every command run so far with its directory.
    pub fn history(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Returns only the executed command lines, in order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|(cmd, _)| cmd.clone())
            .collect()
    }

    /// How many times `cmd` ran.
    pub fn command_count(&self, cmd: &str) -> usize {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|(ran, _)| ran == cmd)
            .count()
    }

    /// Drops the recorded commands, keeping the scripts.
    pub fn forget(&self) {
        self.invocations.lock().unwrap().clear();
    }
}

impl ShellAdapter for MockShellAdapter {
    fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        self.invocations
            .lock()
            .unwrap()
            .push((cmd.to_string(), cwd.map(Path::to_path_buf)));

        let scripted = self.scripted.lock().unwrap().get(cmd).cloned();
        match scripted.or_else(|| self.fallback.lock().unwrap().clone()) {
            Some(output) => Ok(output),
            None => Err(ZenflowError::ShellCommandFailed(format!(
                "no scripted output for `{cmd}`"
            ))),
        }
    }

    fn run_streaming(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        self.run(cmd, cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_remote_listing() {
        let shell = MockShellAdapter::new();
        shell.set_output(
            "git remote -v",
            CommandOutput::ok("origin\tgit@github.com:a/b.git (push)\n"),
        );

        let output = shell.run("git remote -v", None).unwrap();
        assert!(output.success());
        assert!(output.stdout.contains("github.com"));
    }

    #[test]
    fn test_unscripted_command_fails_to_spawn() {
        let shell = MockShellAdapter::new();

        assert!(matches!(
            shell.run("git fetch", None),
            Err(ZenflowError::ShellCommandFailed(_))
        ));
    }

    #[test]
    fn test_fail_on_only_hits_that_command() {
        let shell = MockShellAdapter::with_success();
        shell.fail_on("git pull", 128);

        assert_eq!(shell.run("git pull", None).unwrap().exit_code, 128);
        assert!(shell.run("git push", None).unwrap().success());
    }

    #[test]
    fn test_scripted_git_queries() {
        let shell = MockShellAdapter::new();
        shell.local_branches("hotfix", &["crash", "typo"]);
        shell.git_config("zenflow.token", "secret");

        assert_eq!(
            shell.run("git branch | grep hotfix", None).unwrap().stdout,
            "  hotfix/crash\n  hotfix/typo\n"
        );
        assert_eq!(
            shell.run("git config --get zenflow.token", None).unwrap().stdout,
            "secret\n"
        );
    }

    #[test]
    fn test_history_and_forget() {
        let shell = MockShellAdapter::with_success();

        shell.run("git checkout master", None).unwrap();
        shell.run("git pull", Some(Path::new("/repo"))).unwrap();
        shell.run("git checkout master", None).unwrap();

        assert_eq!(shell.history()[1].1, Some(PathBuf::from("/repo")));
        assert_eq!(shell.command_count("git checkout master"), 2);
        assert_eq!(shell.commands()[1], "git pull");

        shell.forget();
        assert!(shell.commands().is_empty());
        assert!(shell.run("git status", None).unwrap().success());
    }
}
