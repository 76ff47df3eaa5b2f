//! Error types for zenflow operations.
//!
//! This module defines every failure a branch workflow can report. Policy
//! rejections (a declined confirmation, a project that is not deployable, an
//! existing pull request) are errors too: their message is the text shown to
//! the operator, and the binary turns any error into exit status 1.
//!
//! Failed git commands are deliberately absent: they trip the sticky failure
//! flag of [`ExecutionContext`](crate::exec::ExecutionContext) instead.

use crate::flow::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Comprehensive error types for zenflow operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ZenflowError {
    // Repository errors
    /// Neither the directory nor any parent holds a `.git` entry.
    #[error("Not a git repository (or any parent up to mount point): {0}")]
    NotGitRepository(PathBuf),

    /// No URL could be found for the remote, so the repository slug is unknown.
    #[error("could not determine the repository for remote '{0}'")]
    UnknownRepository(String),

    // Flow errors
    /// No flow is registered under the given name.
    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    /// A flow needs a branch role that is not configured.
    #[error("the {flow} flow has no {role} branch configured")]
    BranchRoleMissing {
        /// Flow name.
        flow: String,
        /// Missing role.
        role: Role,
    },

    /// A single branch was required but the role holds several.
    #[error("the {flow} flow has {count} {role} branches, expected exactly one")]
    AmbiguousBranchRole {
        /// Flow name.
        flow: String,
        /// Role asked for.
        role: Role,
        /// Number of configured branches.
        count: usize,
    },

    // Policy rejections
    /// The operator answered "no" to a confirmation gate.
    #[error("{0}")]
    ConfirmationDeclined(String),

    /// The project configuration does not allow deployments.
    #[error("This project is not deployable right now")]
    NotDeployable,

    /// A pull request for the work branch is already open.
    #[error("A pull request for {reference} already exists\n       {html_url}")]
    PullRequestExists {
        /// Head ref of the work branch.
        reference: String,
        /// Location of the existing pull request.
        html_url: String,
    },

    /// No open pull request matches the ref.
    #[error("No open pull request was found for {0}")]
    PullRequestNotFound(String),

    // Version errors
    /// The version file does not exist.
    #[error("No version file found (looking for {0}).")]
    VersionFileMissing(PathBuf),

    /// A bump level other than major, minor or patch was requested.
    #[error("Invalid version part: {0}")]
    InvalidVersionLevel(String),

    /// The version file could not be parsed.
    #[error("corrupted version file {path}: {message}")]
    CorruptedVersion {
        /// Version file location.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    // Config errors
    /// Error parsing the configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    /// Error serializing the configuration file.
    #[error("config write error: {0}")]
    ConfigWriteError(String),

    /// The project already has a configuration file.
    #[error("There is an existing config file: {0}")]
    AlreadyConfigured(PathBuf),

    // Remote API errors
    /// The hosting API could not be reached or returned an unreadable body.
    #[error("github request failed: {0}")]
    GithubRequestFailed(String),

    // File system errors
    /// Path not found in the file system.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Error reading file.
    #[error("file read error: {0}")]
    FileReadError(String),

    /// Error writing file.
    #[error("file write error: {0}")]
    FileWriteError(String),

    /// Permission denied for the specified operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // Tool/adapter errors
    /// The shell itself could not be started.
    #[error("shell command failed: {0}")]
    ShellCommandFailed(String),

    /// Prompting the operator failed or was interrupted.
    #[error(transparent)]
    Ask(#[from] zenflow_ask::AskError),

    // IO and system errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context from anyhow.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ZenflowError {
    /// Whether the operator interrupted a prompt.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, ZenflowError::Ask(zenflow_ask::AskError::Interrupted))
    }
}

/// Result type alias for zenflow operations.
pub type Result<T> = std::result::Result<T, ZenflowError>;
