//! Branch primitives.
//!
//! Each primitive narrates what it is about to do and issues one git command
//! line through the [`ExecutionContext`]. None of them inspect the result:
//! a failing command trips the context's failure flag and every later
//! primitive becomes a no-op.

use crate::config::{MergeStrategy, RemoteSet, ZenflowConfig};
use crate::error::Result;
use crate::exec::{ExecutionContext, RunOptions, shell_escape_for_single_quoting};
use crate::log;
use regex::Regex;
use zenflow_ask::{Ask, Question};

/// Marker returned by [`Branches::list`] when no branch matches.
pub const NO_BRANCHES: &str = "!! NONE !!";

/// Git branch operations for one repository.
pub struct Branches<'a> {
    exec: &'a ExecutionContext,
    ask: &'a dyn Ask,
    remotes: RemoteSet,
    strategy: Option<MergeStrategy>,
}

impl<'a> Branches<'a> {
    /// Creates the primitives for a configured repository.
    pub fn new(exec: &'a ExecutionContext, ask: &'a dyn Ask, config: &ZenflowConfig) -> Self {
        Self {
            exec,
            ask,
            remotes: config.remotes(),
            strategy: config.settings.merge_strategy,
        }
    }

    fn strategy(&self, rebase_override: bool) -> MergeStrategy {
        if rebase_override {
            MergeStrategy::Rebase
        } else {
            self.strategy.unwrap_or_default()
        }
    }

    fn remotes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.remotes.primary.as_str()).chain(self.remotes.backup.as_deref())
    }

    /// Local branches whose name contains `prefix`, with the prefix removed.
    ///
    /// Returns `["!! NONE !!"]` when nothing matches.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let output = self
            .exec
            .run(&format!("git branch | grep {prefix}"), RunOptions::silent())?;
        if output.trim().is_empty() {
            return Ok(vec![NO_BRANCHES.to_string()]);
        }

        let pattern = Regex::new(&format!(r".*{}/?", regex::escape(prefix)))
            .map_err(anyhow::Error::from)?;
        Ok(output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| pattern.replace(line, "").into_owned())
            .collect())
    }

    /// Identifier of the checked-out branch when it belongs to `prefix`.
    pub fn current(&self, prefix: &str) -> Result<Option<String>> {
        let output = self.exec.run(
            &format!("git branch | grep '* {prefix}'"),
            RunOptions::silent(),
        )?;
        let line = output.lines().next().unwrap_or_default().trim_end();
        if line.is_empty() {
            return Ok(None);
        }
        let marker = format!("* {prefix}");
        let rest = line.strip_prefix(&marker).unwrap_or(line);
        let identifier = rest.strip_prefix('/').unwrap_or(rest);
        Ok(Some(identifier.to_string()))
    }

    /// Checks out `name` and pulls it, rebasing when the strategy says so.
    pub fn update(&self, name: &str, rebase_override: bool) -> Result<()> {
        match self.strategy(rebase_override) {
            MergeStrategy::Rebase => {
                log::say(&format!(
                    "Updating the {name} branch using pull with --rebase"
                ));
                self.exec.run(
                    &format!("git checkout {name} && git pull --rebase"),
                    RunOptions::default(),
                )?;
            }
            MergeStrategy::Merge => {
                log::say(&format!("Updating the {name} branch"));
                self.exec.run(
                    &format!("git checkout {name} && git pull"),
                    RunOptions::default(),
                )?;
            }
        }
        Ok(())
    }

    /// Brings `{flow}/{identifier}` up to date with `destination`.
    ///
    /// Rebases the work branch onto `destination`, or checks the work
    /// branch out and merges `destination` into it.
    pub fn apply_merge_strategy(
        &self,
        flow: &str,
        identifier: &str,
        destination: &str,
        rebase_override: bool,
    ) -> Result<()> {
        let work = format!("{flow}/{identifier}");
        match self.strategy(rebase_override) {
            MergeStrategy::Rebase => self.rebase(&work, destination),
            MergeStrategy::Merge => {
                self.checkout(&work)?;
                self.merge(destination)
            }
        }
    }

    /// Creates `name` from `base` and checks it out.
    pub fn create(&self, name: &str, base: &str) -> Result<()> {
        log::say(&format!("Creating the {name} branch based on {base}"));
        self.exec.run(
            &format!("git checkout -b {name} {base}"),
            RunOptions::default(),
        )?;
        Ok(())
    }

    /// Pushes `name` to the primary remote, then to the backup remote.
    pub fn push(&self, name: &str) -> Result<()> {
        for (index, remote) in self.remotes().enumerate() {
            if index > 0 && self.exec.failed() {
                break;
            }
            log::say(&format!("Pushing the {name} branch to {remote}"));
            self.exec
                .run(&format!("git push {remote} {name}"), RunOptions::default())?;
        }
        Ok(())
    }

    /// Pushes tags to the primary remote, then to the backup remote.
    pub fn push_tags(&self) -> Result<()> {
        for (index, remote) in self.remotes().enumerate() {
            if index > 0 && self.exec.failed() {
                break;
            }
            log::say(&format!("Pushing tags to {remote}"));
            self.exec
                .run(&format!("git push {remote} --tags"), RunOptions::default())?;
        }
        Ok(())
    }

    /// Sets the upstream of `name` to the same branch on the primary remote.
    pub fn track(&self, name: &str) -> Result<()> {
        let remote = &self.remotes.primary;
        log::say(&format!(
            "Tracking the {name} branch against {remote}/{name}"
        ));
        self.exec.run(
            &format!("git branch --set-upstream-to={remote}/{name} {name}"),
            RunOptions::default(),
        )?;
        Ok(())
    }

    /// Checks out `name`.
    pub fn checkout(&self, name: &str) -> Result<()> {
        log::say(&format!("Switching to the {name} branch"));
        self.exec
            .run(&format!("git checkout {name}"), RunOptions::default())?;
        Ok(())
    }

    /// Rebases `name` onto `onto`.
    pub fn rebase(&self, name: &str, onto: &str) -> Result<()> {
        log::say(&format!("Rebasing {name} on top of the {onto} branch"));
        self.exec
            .run(&format!("git rebase {onto} {name}"), RunOptions::default())?;
        Ok(())
    }

    /// Merges `name` into the checked-out branch with a merge commit.
    pub fn merge(&self, name: &str) -> Result<()> {
        log::say(&format!("Merging in the {name} branch"));
        self.exec
            .run(&format!("git merge --no-ff {name}"), RunOptions::default())?;
        Ok(())
    }

    /// Creates an annotated tag, asking for whatever was not supplied.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::Ask` if prompting is interrupted.
    pub fn tag(&self, name: Option<&str>, description: Option<&str>) -> Result<()> {
        log::say("Tagging the release");
        let name = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => self.ask.ask(&Question::new("Name of the tag:").required())?,
        };
        let description = match description.filter(|d| !d.trim().is_empty()) {
            Some(description) => description.to_string(),
            None => self.ask.ask(&Question::new("Tag message:").required())?,
        };
        self.exec.run(
            &format!(
                "git tag -a '{name}' -m '{}'",
                shell_escape_for_single_quoting(&description)
            ),
            RunOptions::default(),
        )?;
        Ok(())
    }

    /// Deletes `name` from every remote that has it.
    pub fn delete_remote(&self, name: &str) -> Result<()> {
        for (index, remote) in self.remotes().enumerate() {
            if index > 0 && self.exec.failed() {
                break;
            }
            log::say(&format!("Removing the remote branch from {remote}"));
            self.exec.run(
                &format!(
                    "git branch -r | grep {remote}/{name} && git push {remote} :{name} || echo ''"
                ),
                RunOptions::default(),
            )?;
        }
        Ok(())
    }

    /// Deletes the local branch `name`.
    pub fn delete_local(&self, name: &str, force: bool) -> Result<()> {
        log::say("Removing the local branch");
        let flag = if force { "D" } else { "d" };
        self.exec
            .run(&format!("git branch -{flag} {name}"), RunOptions::default())?;
        Ok(())
    }
}
