//! Zenflow Core - branch lifecycle engine for git-flow style projects.
//!
//! This crate provides the lifecycle operations (start, update, deploy,
//! review, finish, abort, publish) for the built-in flows, together with
//! the pieces they are composed of: shell execution with a sticky failure
//! flag, git branch primitives, version and changelog management, and the
//! pull request client.
//!
//! # Architecture
//!
//! The core crate is organized into several modules:
//!
//! - [`error`]: Error types and result type alias
//! - [`config`]: Project settings and derived file locations
//! - [`exec`]: Command execution with the sticky failure flag
//! - [`branch`]: Git branch primitives
//! - [`version`] / [`changelog`]: Release bookkeeping files
//! - [`github`]: Pull request API
//! - [`flow`]: Flow definitions and the registry of built-in flows
//! - [`workflows`]: Lifecycle operations over a [`FlowContext`]
//! - [`runtime`]: Facade used by the command line
//!
//! # Example
//!
//! ```rust,ignore
//! use zenflow_core::{FlowOptions, FlowRuntime, ZenflowConfig};
//! use std::path::PathBuf;
//!
//! let config = ZenflowConfig::load(PathBuf::from("/path/to/repo"))?;
//! let runtime = FlowRuntime::new(config);
//!
//! runtime.start("feature", Some("login-form"), FlowOptions::default())?;
//! runtime.finish("feature", FlowOptions::default())?;
//! ```
//!
//! # Failure semantics
//!
//! A git or deploy command that exits non-zero does not return an error.
//! It trips the [`ExecutionContext`] failure flag and every later command
//! of the invocation is skipped. Files already rewritten (version file,
//! changelog) are not restored, so an aborted `finish` can leave a bumped
//! version behind.

pub mod branch;
pub mod changelog;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod flow;
pub mod github;
pub mod log;
pub mod repo;
pub mod runtime;
pub mod tools;
pub mod version;
pub mod workflows;

// Re-export core types for convenience
pub use branch::Branches;
pub use changelog::{ChangelogManager, ChangelogUpdate};
pub use config::{MergeStrategy, ProjectSettings, RemoteSet, ZenflowConfig};
pub use context::{FlowContext, FlowOptions};
pub use error::{Result, ZenflowError};
pub use exec::{ExecutionContext, RunOptions};
pub use flow::{
    BranchRole, ChangelogPolicy, FlowDefinition, FlowKind, FlowRegistry, Role, RoleShape,
};
pub use runtime::FlowRuntime;
pub use tools::ToolRegistry;
pub use version::{Version, VersionLevel, VersionManager};
