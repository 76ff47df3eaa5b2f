//! Standard shell adapter implementation.

use crate::error::{Result, ZenflowError};
use crate::tools::shell::{CommandOutput, ShellAdapter};
use std::path::Path;
use std::process::{Command, Stdio};

/// Shell adapter running commands through `sh -c`.
///
/// Commands rely on POSIX quoting, pipes and `&&`, so there is no
/// `cmd.exe` variant.
#[derive(Debug, Default)]
pub struct StdShellAdapter;

impl StdShellAdapter {
    /// Creates a new standard shell adapter.
    pub fn new() -> Self {
        Self
    }

    fn command(cmd: &str, cwd: Option<&Path>) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        command
    }
}

fn spawn_error(cmd: &str, e: std::io::Error) -> ZenflowError {
    ZenflowError::ShellCommandFailed(format!("could not run `{cmd}`: {e}"))
}

impl ShellAdapter for StdShellAdapter {
    fn run(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        let output = Self::command(cmd, cwd)
            .output()
            .map_err(|e| spawn_error(cmd, e))?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Hands the terminal to the command, as `git difftool` needs.
    fn run_streaming(&self, cmd: &str, cwd: Option<&Path>) -> Result<CommandOutput> {
        let status = Self::command(cmd, cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(cmd, e))?;

        Ok(CommandOutput {
            exit_code: status.code().unwrap_or(-1),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_pipeline() {
        let adapter = StdShellAdapter::new();
        let output = adapter
            .run("printf 'feature/a\\nmaster\\n' | grep feature", None)
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "feature/a");
    }

    #[test]
    fn test_run_with_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StdShellAdapter::new();
        let output = adapter.run("pwd", Some(dir.path())).unwrap();

        assert!(output.success());
        let expected = dir.path().canonicalize().unwrap();
        let actual = Path::new(output.stdout.trim()).canonicalize().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_grep_without_match_exits_one() {
        let adapter = StdShellAdapter::new();
        let output = adapter.run("echo master | grep feature", None).unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, 1);
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_or_fallback_succeeds() {
        let adapter = StdShellAdapter::new();
        let output = adapter.run("false || echo ''", None).unwrap();

        assert!(output.success());
    }
}
