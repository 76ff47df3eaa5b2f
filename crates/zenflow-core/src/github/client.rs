//! Blocking HTTP client for the pull request API.

use crate::error::{Result, ZenflowError};
use crate::exec::ExecutionContext;
use crate::github::hub::HubSettings;
use crate::github::pull_request::{NewPullRequest, PullRequest, PullRequestApi};
use crate::repo::RemoteRepository;
use crate::tools::shell_impl::StdShellAdapter;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Pull request client for one repository.
pub struct GithubClient {
    client: reqwest::blocking::Client,
    base: Option<String>,
    remote: String,
    token: Option<String>,
    user_agent: String,
}

impl GithubClient {
    /// Creates a client for `slug` (`owner/name`).
    ///
    /// Without a slug every request fails with
    /// `ZenflowError::UnknownRepository`.
    pub fn new(settings: &HubSettings, slug: Option<&str>, remote: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            client,
            base: slug.map(|slug| {
                format!(
                    "{}/repos/{}",
                    settings.api_base_url.trim_end_matches('/'),
                    slug
                )
            }),
            remote: remote.to_string(),
            token: settings.token.clone(),
            user_agent: settings.user_agent(),
        }
    }

    /// Repository API root, e.g. `https://api.github.com/repos/owner/name`.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    fn url(&self, path: &str) -> Result<String> {
        let base = self
            .base
            .as_deref()
            .ok_or_else(|| ZenflowError::UnknownRepository(self.remote.clone()))?;
        Ok(format!("{base}{path}"))
    }

    fn request(&self, builder: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        let builder = builder
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent);
        match &self.token {
            Some(token) => builder.header("Authorization", format!("token {token}")),
            None => builder,
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        builder: reqwest::blocking::RequestBuilder,
    ) -> Result<T> {
        tracing::debug!(method, path, "github request");
        let response = self
            .request(builder)
            .send()
            .map_err(|e| ZenflowError::GithubRequestFailed(format!("{method} {path}: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ZenflowError::GithubRequestFailed(format!("{method} {path}: {e}")))?;
        if !status.is_success() {
            tracing::debug!(%status, "github request returned an error status");
        }
        serde_json::from_str(&body).map_err(|e| {
            ZenflowError::GithubRequestFailed(format!("{method} {path}: HTTP {status}: {e}"))
        })
    }
}

impl PullRequestApi for GithubClient {
    fn list(&self) -> Result<Vec<PullRequest>> {
        let url = self.url("/pulls")?;
        self.send("GET", "/pulls", self.client.get(url))
    }

    fn find(&self, number: u64) -> Result<PullRequest> {
        let path = format!("/pulls/{number}");
        let url = self.url(&path)?;
        self.send("GET", &path, self.client.get(url))
    }

    // Validation failures come back as 422 with an `errors` body; they are
    // returned as an invalid pull request rather than an error.
    fn create(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let url = self.url("/pulls")?;
        self.send("POST", "/pulls", self.client.post(url).json(request))
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base", &self.base)
            .field("remote", &self.remote)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Pull request API for the repository in `root`, connected on first use.
///
/// The remote url and hub credentials are read from git the first time a
/// request is made, so commands that never touch pull requests never query
/// git for them.
pub struct RepositoryPulls {
    root: PathBuf,
    remote: String,
    client: OnceLock<GithubClient>,
}

impl RepositoryPulls {
    /// Creates an unconnected client for `remote` of the repository in `root`.
    pub fn new(root: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            remote: remote.into(),
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&GithubClient> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let exec = ExecutionContext::new(Box::new(StdShellAdapter::new()), Some(self.root.clone()));
        let repository = RemoteRepository::detect(&exec, &self.remote)?;
        let settings = HubSettings::load(&exec, repository.hub_or_default())?;
        tracing::debug!(hub = %settings.hub, slug = ?repository.slug, "connecting pull request client");
        let client = GithubClient::new(&settings, repository.slug.as_deref(), &self.remote);
        Ok(self.client.get_or_init(|| client))
    }
}

impl PullRequestApi for RepositoryPulls {
    fn list(&self) -> Result<Vec<PullRequest>> {
        self.client()?.list()
    }

    fn find(&self, number: u64) -> Result<PullRequest> {
        self.client()?.find(number)
    }

    fn create(&self, request: &NewPullRequest) -> Result<PullRequest> {
        self.client()?.create(request)
    }
}

impl std::fmt::Debug for RepositoryPulls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryPulls")
            .field("root", &self.root)
            .field("remote", &self.remote)
            .field("connected", &self.client.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> HubSettings {
        HubSettings {
            hub: "github.com".to_string(),
            api_base_url: "https://api.github.com/".to_string(),
            token: Some("secret".to_string()),
            user_agent_base: "Zencoder".to_string(),
        }
    }

    #[test]
    fn test_base_url_includes_slug() {
        let client = GithubClient::new(&settings(), Some("zencoder/zenflow"), "origin");
        assert_eq!(
            client.base(),
            Some("https://api.github.com/repos/zencoder/zenflow")
        );
    }

    #[test]
    fn test_unknown_repository() {
        let client = GithubClient::new(&settings(), None, "origin");
        assert!(matches!(
            client.list(),
            Err(ZenflowError::UnknownRepository(remote)) if remote == "origin"
        ));
    }

    #[test]
    fn test_repository_pulls_start_unconnected() {
        let pulls = RepositoryPulls::new("/repo", "origin");
        assert!(format!("{pulls:?}").contains("connected: false"));
    }
}
