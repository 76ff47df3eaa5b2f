//! Per-invocation flow context.

use crate::branch::Branches;
use crate::changelog::ChangelogManager;
use crate::config::{MergeStrategy, ZenflowConfig};
use crate::error::Result;
use crate::exec::{ExecutionContext, RunOptions, shell_escape_for_single_quoting};
use crate::flow::FlowDefinition;
use crate::tools::ToolRegistry;
use crate::version::VersionManager;
use regex::Regex;
use std::cell::OnceCell;
use zenflow_ask::Question;

/// Pattern work branch identifiers must match.
pub const IDENTIFIER_PATTERN: &str = r"^[-_0-9a-z]+$";

/// Shown when an identifier does not match [`IDENTIFIER_PATTERN`].
pub const IDENTIFIER_ERROR: &str = "Names can only contain dashes, underscores, 0-9, and a-z";

/// Command line switches shared by the lifecycle operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowOptions {
    /// Skip every remote interaction.
    pub offline: bool,
    /// Rebase instead of merging, whatever the configured strategy.
    pub rebase: bool,
    /// Run migrations when deploying.
    pub migrations: bool,
}

/// Everything a lifecycle operation needs for one flow.
///
/// The work branch identifier is resolved at most once: from the checked-out
/// branch if it belongs to the flow, otherwise by asking the operator.
pub struct FlowContext<'a> {
    /// Flow being operated on.
    pub flow: &'a FlowDefinition,
    /// Project configuration.
    pub config: &'a ZenflowConfig,
    /// Command runner with the sticky failure flag.
    pub exec: &'a ExecutionContext,
    /// Adapters for files, prompts and pull requests.
    pub tools: &'a ToolRegistry,
    /// Command line switches.
    pub options: FlowOptions,
    identifier: OnceCell<String>,
}

impl<'a> FlowContext<'a> {
    /// Creates a context with an unresolved identifier.
    pub fn new(
        flow: &'a FlowDefinition,
        config: &'a ZenflowConfig,
        exec: &'a ExecutionContext,
        tools: &'a ToolRegistry,
        options: FlowOptions,
    ) -> Self {
        Self {
            flow,
            config,
            exec,
            tools,
            options,
            identifier: OnceCell::new(),
        }
    }

    /// Flow name.
    pub fn name(&self) -> &str {
        self.flow.name()
    }

    /// Branch primitives bound to this repository.
    pub fn branches(&self) -> Branches<'_> {
        Branches::new(self.exec, self.tools.ask.as_ref(), self.config)
    }

    /// Version file manager.
    pub fn versions(&self) -> VersionManager<'_> {
        VersionManager::new(self.tools.fs.as_ref(), self.exec, &self.config.version_file)
    }

    /// Changelog manager.
    pub fn changelog(&self) -> ChangelogManager<'_> {
        ChangelogManager::new(
            self.tools.fs.as_ref(),
            self.exec,
            self.tools.ask.as_ref(),
            self.versions(),
            &self.config.changelog_file,
        )
    }

    /// Effective merge strategy for this invocation.
    pub fn strategy(&self) -> MergeStrategy {
        self.config.merge_strategy(self.options.rebase)
    }

    /// Whether remotes may be touched.
    pub fn online(&self) -> bool {
        !self.options.offline
    }

    /// Command used to open urls.
    pub fn open_command(&self) -> &str {
        self.config.settings.open_command.as_deref().unwrap_or("open")
    }

    /// Opens `url` with the open command, single-quoted.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ShellCommandFailed` if the shell cannot start.
    pub fn open_url(&self, url: &str) -> Result<()> {
        self.exec.run(
            &format!(
                "{} '{}'",
                self.open_command(),
                shell_escape_for_single_quoting(url)
            ),
            RunOptions::default(),
        )?;
        Ok(())
    }

    /// Asks for an identifier, lower-casing it before validation.
    ///
    /// A `supplied` value is used without prompting when it is valid. Typed
    /// and supplied names are folded the same way.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::Ask` if the operator interrupts the prompt.
    pub fn prompt_identifier(&self, supplied: Option<&str>) -> Result<String> {
        let pattern = Regex::new(IDENTIFIER_PATTERN).map_err(anyhow::Error::from)?;
        let question = Question::new(format!("Name of the {}:", self.name()))
            .required()
            .lowercased()
            .with_validation(pattern, IDENTIFIER_ERROR)
            .with_response(supplied);
        Ok(self.tools.ask.ask(&question)?)
    }

    /// Fixes the identifier for the rest of the invocation.
    pub fn set_identifier(&self, identifier: String) -> &str {
        self.identifier.get_or_init(|| identifier)
    }

    /// Identifier of the work branch.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::Ask` if prompting is interrupted.
    pub fn identifier(&self) -> Result<&str> {
        if let Some(identifier) = self.identifier.get() {
            return Ok(identifier);
        }
        let identifier = match self.branches().current(self.name())? {
            Some(current) => current,
            None => self.prompt_identifier(None)?,
        };
        tracing::debug!(flow = self.name(), %identifier, "resolved work branch");
        Ok(self.set_identifier(identifier))
    }

    /// Full name of the work branch, `{flow}/{identifier}`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::Ask` if prompting is interrupted.
    pub fn work_branch(&self) -> Result<String> {
        Ok(self.flow.work_branch(self.identifier()?))
    }
}

impl std::fmt::Debug for FlowContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowContext")
            .field("flow", &self.flow.name())
            .field("options", &self.options)
            .field("identifier", &self.identifier.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowRegistry;
    use crate::github::MockPullRequestApi;
    use crate::tools::fs_mock::MockFsAdapter;
    use crate::tools::shell_mock::MockShellAdapter;
    use std::path::PathBuf;
    use zenflow_ask::ScriptedAsk;

    fn tools(ask: &ScriptedAsk) -> ToolRegistry {
        ToolRegistry::new(
            Box::new(MockFsAdapter::new()),
            Box::new(ask.clone()),
            Box::new(MockPullRequestApi::new()),
        )
    }

    fn config() -> ZenflowConfig {
        let mut config = ZenflowConfig::new(PathBuf::from("/repo"));
        config.settings.development_branch = Some("master".to_string());
        config
    }

    #[test]
    fn test_identifier_from_current_branch() {
        let shell = MockShellAdapter::with_success();
        shell.checked_out("feature", "login");
        let exec = ExecutionContext::new(Box::new(shell.clone()), None);
        let ask = ScriptedAsk::default();
        let tools = tools(&ask);
        let config = config();
        let registry = FlowRegistry::from_settings(&config.settings);
        let ctx = FlowContext::new(
            registry.get("feature").unwrap(),
            &config,
            &exec,
            &tools,
            FlowOptions::default(),
        );

        assert_eq!(ctx.work_branch().unwrap(), "feature/login");
        assert_eq!(ctx.identifier().unwrap(), "login");
        assert_eq!(shell.commands().len(), 1);
        assert!(ask.asked().is_empty());
    }

    #[test]
    fn test_identifier_prompted_and_validated() {
        let exec = ExecutionContext::new(Box::new(MockShellAdapter::with_success()), None);
        let ask = ScriptedAsk::new(["bad name", "good-name"]);
        let tools = tools(&ask);
        let config = config();
        let registry = FlowRegistry::from_settings(&config.settings);
        let ctx = FlowContext::new(
            registry.get("bug").unwrap(),
            &config,
            &exec,
            &tools,
            FlowOptions::default(),
        );

        assert_eq!(ctx.identifier().unwrap(), "good-name");
        assert_eq!(ask.asked(), vec!["Name of the bug:"]);
    }

    #[test]
    fn test_supplied_identifier_is_lowercased() {
        let exec = ExecutionContext::new(Box::new(MockShellAdapter::with_success()), None);
        let ask = ScriptedAsk::default();
        let tools = tools(&ask);
        let config = config();
        let registry = FlowRegistry::from_settings(&config.settings);
        let ctx = FlowContext::new(
            registry.get("feature").unwrap(),
            &config,
            &exec,
            &tools,
            FlowOptions::default(),
        );

        assert_eq!(ctx.prompt_identifier(Some("My_Feature")).unwrap(), "my_feature");
    }

    #[test]
    fn test_typed_identifier_is_folded_like_supplied_one() {
        let exec = ExecutionContext::new(Box::new(MockShellAdapter::with_success()), None);
        let ask = ScriptedAsk::new(["My_Feature"]);
        let tools = tools(&ask);
        let config = config();
        let registry = FlowRegistry::from_settings(&config.settings);
        let ctx = FlowContext::new(
            registry.get("feature").unwrap(),
            &config,
            &exec,
            &tools,
            FlowOptions::default(),
        );

        assert_eq!(ctx.prompt_identifier(None).unwrap(), "my_feature");
        assert_eq!(ask.remaining(), 0);
    }
}
