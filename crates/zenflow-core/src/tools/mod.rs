//! Tool adapters and registry for zenflow workflows.
//!
//! Workflows reach the outside world through adapter traits so every
//! lifecycle operation can run against mocks: the file system (version file
//! and changelog), the operator (prompts) and the pull request API. Shell
//! commands go through the [`ExecutionContext`](crate::exec::ExecutionContext),
//! which owns its own [`ShellAdapter`](shell::ShellAdapter).

pub mod fs;
pub mod fs_impl;
pub mod fs_mock;
pub mod shell;
pub mod shell_impl;
pub mod shell_mock;

use crate::github::PullRequestApi;
use zenflow_ask::Ask;

/// Tool registry that owns the adapters a workflow needs.
pub struct ToolRegistry {
    /// File system adapter for the version file and changelog.
    pub fs: Box<dyn fs::FsAdapter>,

    /// Prompt adapter for questions to the operator.
    pub ask: Box<dyn Ask>,

    /// Pull request API for reviews.
    pub pulls: Box<dyn PullRequestApi>,
}

impl ToolRegistry {
    /// Creates a new tool registry with the provided adapters.
    pub fn new(
        fs: Box<dyn fs::FsAdapter>,
        ask: Box<dyn Ask>,
        pulls: Box<dyn PullRequestApi>,
    ) -> Self {
        Self { fs, ask, pulls }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("fs", &"Box<dyn FsAdapter>")
            .field("ask", &"Box<dyn Ask>")
            .field("pulls", &"Box<dyn PullRequestApi>")
            .finish()
    }
}
