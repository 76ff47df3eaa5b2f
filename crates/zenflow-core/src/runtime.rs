//! Runtime for zenflow lifecycle operations.
//!
//! This module provides the `FlowRuntime` struct which owns the configuration,
//! the flow registry, the tool adapters and the execution context for one
//! invocation, and dispatches to the workflow functions.

use crate::config::{ProjectSettings, ZenflowConfig};
use crate::context::{FlowContext, FlowOptions};
use crate::error::Result;
use crate::exec::ExecutionContext;
use crate::flow::FlowRegistry;
use crate::github::{PullRequest, RepositoryPulls};
use crate::tools::ToolRegistry;
use crate::tools::fs_impl::StdFsAdapter;
use crate::tools::shell_impl::StdShellAdapter;
use crate::workflows;
use zenflow_ask::TerminalAsk;

/// Runtime for zenflow lifecycle operations.
///
/// Each lifecycle method builds a fresh [`FlowContext`] for the named flow,
/// so the identifier is resolved once per call. The execution context is
/// shared: after one failed command, every later command of the invocation
/// is skipped.
///
/// # Examples
///
/// ```no_run
/// use zenflow_core::{FlowOptions, FlowRuntime, ZenflowConfig};
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ZenflowConfig::load(PathBuf::from("/path/to/repo"))?;
/// let runtime = FlowRuntime::new(config);
///
/// runtime.start("feature", Some("login-form"), FlowOptions::default())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FlowRuntime {
    /// Project configuration.
    pub config: ZenflowConfig,

    /// Flows built from the configuration.
    pub flows: FlowRegistry,

    /// Adapters for files, prompts and pull requests.
    pub tools: ToolRegistry,

    /// Command runner shared by every operation of the invocation.
    pub exec: ExecutionContext,
}

impl FlowRuntime {
    /// Creates a runtime backed by the real shell, file system and terminal.
    ///
    /// Commands run in the repository root. The pull request client connects
    /// to the primary remote's repository the first time it is used.
    pub fn new(config: ZenflowConfig) -> Self {
        let exec = ExecutionContext::new(
            Box::new(StdShellAdapter::new()),
            Some(config.repo_root.clone()),
        );
        let tools = ToolRegistry::new(
            Box::new(StdFsAdapter::new()),
            Box::new(TerminalAsk::new()),
            Box::new(RepositoryPulls::new(
                config.repo_root.clone(),
                config.remotes().primary,
            )),
        );
        Self::with_tools(config, exec, tools)
    }

    /// Creates a runtime with explicit adapters.
    ///
    /// # Arguments
    ///
    /// * `config` - Project configuration.
    /// * `exec` - Execution context, usually over a `MockShellAdapter` in tests.
    /// * `tools` - File system, prompt and pull request adapters.
    pub fn with_tools(config: ZenflowConfig, exec: ExecutionContext, tools: ToolRegistry) -> Self {
        let flows = FlowRegistry::from_settings(&config.settings);
        Self {
            config,
            flows,
            tools,
            exec,
        }
    }

    /// Context for one operation on the flow called `name`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::UnknownFlow` if no such flow exists.
    pub fn flow(&self, name: &str, options: FlowOptions) -> Result<FlowContext<'_>> {
        let flow = self.flows.get(name)?;
        Ok(FlowContext::new(
            flow,
            &self.config,
            &self.exec,
            &self.tools,
            options,
        ))
    }

    /// Starts a work branch. See [`workflows::start`].
    ///
    /// # Returns
    ///
    /// The full work branch name.
    pub fn start(&self, flow: &str, name: Option<&str>, options: FlowOptions) -> Result<String> {
        workflows::start(&self.flow(flow, options)?, name)
    }

    /// Updates the work branch from its source. See [`workflows::update`].
    pub fn update(&self, flow: &str, options: FlowOptions) -> Result<()> {
        workflows::update(&self.flow(flow, options)?)
    }

    /// Deploys the work branch to the flow's deploy branches.
    /// See [`workflows::deploy`].
    pub fn deploy(&self, flow: &str, options: FlowOptions) -> Result<()> {
        workflows::deploy(&self.flow(flow, options)?)
    }

    /// Pushes `target` and runs its deploy command, outside of any flow.
    pub fn deploy_to(&self, target: &str, migrations: bool) -> Result<()> {
        let branches = crate::branch::Branches::new(&self.exec, self.tools.ask.as_ref(), &self.config);
        workflows::deploy_to(
            &self.exec,
            &branches,
            self.tools.fs.as_ref(),
            &self.config,
            target,
            migrations,
        )
    }

    /// Opens a pull request for the work branch. See [`workflows::review`].
    pub fn review(&self, flow: &str, options: FlowOptions) -> Result<PullRequest> {
        workflows::review(&self.flow(flow, options)?)
    }

    /// Lists open pull requests.
    pub fn list_reviews(&self) -> Result<Vec<PullRequest>> {
        workflows::list_reviews(self.tools.pulls.as_ref())
    }

    /// Finishes the work branch. See [`workflows::finish`].
    pub fn finish(&self, flow: &str, options: FlowOptions) -> Result<()> {
        workflows::finish(&self.flow(flow, options)?)
    }

    /// Abandons the work branch. See [`workflows::abort`].
    pub fn abort(&self, flow: &str, options: FlowOptions) -> Result<()> {
        workflows::abort(&self.flow(flow, options)?)
    }

    /// Pushes and tracks the work branch. See [`workflows::publish`].
    pub fn publish(&self, flow: &str, options: FlowOptions) -> Result<()> {
        workflows::publish(&self.flow(flow, options)?)
    }

    /// Lists the local branches of a flow.
    pub fn branches(&self, flow: &str) -> Result<Vec<String>> {
        workflows::branches(&self.flow(flow, FlowOptions::default())?)
    }

    /// Runs the difftool against the flow's source branch.
    pub fn diff(&self, flow: &str) -> Result<()> {
        workflows::diff(&self.flow(flow, FlowOptions::default())?)
    }

    /// Opens the compare view for the work branch.
    ///
    /// # Returns
    ///
    /// The url that was opened.
    pub fn compare(&self, flow: &str) -> Result<String> {
        workflows::compare(&self.flow(flow, FlowOptions::default())?)
    }

    /// Writes `.zenflow.toml` interactively and rebuilds the flows from it.
    /// See [`workflows::init`].
    pub fn init(&mut self) -> Result<ProjectSettings> {
        let settings = workflows::init(
            &mut self.config,
            self.tools.ask.as_ref(),
            self.tools.fs.as_ref(),
        )?;
        self.flows = FlowRegistry::from_settings(&self.config.settings);
        Ok(settings)
    }
}
