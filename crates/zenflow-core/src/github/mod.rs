//! Pull request access for the hosting service.
//!
//! [`PullRequestApi`] is the boundary the review workflow talks to;
//! [`GithubClient`] implements it over HTTP and [`MockPullRequestApi`]
//! in memory.

pub mod client;
pub mod hub;
pub mod mock;
pub mod pull_request;

pub use client::{GithubClient, RepositoryPulls};
pub use hub::HubSettings;
pub use mock::MockPullRequestApi;
pub use pull_request::{ApiError, NewPullRequest, PullRef, PullRequest, PullRequestApi};
