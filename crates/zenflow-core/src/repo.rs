//! Repository identity derived from the configured remote.

use crate::error::Result;
use crate::exec::{ExecutionContext, RunOptions};
use regex::Regex;

/// Hub used when the remote url does not name one.
pub const DEFAULT_HUB: &str = "github.com";

/// Where the repository is hosted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Fetch/push url of the remote.
    pub url: Option<String>,
    /// Host, e.g. `github.com`.
    pub hub: Option<String>,
    /// `owner/name`.
    pub slug: Option<String>,
}

impl RemoteRepository {
    /// Reads `git remote -v` and parses the entry for `remote`.
    pub fn detect(exec: &ExecutionContext, remote: &str) -> Result<Self> {
        let output = exec.run("git remote -v", RunOptions::silent())?;
        Ok(Self::parse(&output, remote))
    }

    /// Parses `git remote -v` output.
    pub fn parse(remotes: &str, remote: &str) -> Self {
        let url = Regex::new(&format!(r"(?m)^{}\s+(\S+)", regex::escape(remote)))
            .ok()
            .and_then(|pattern| pattern.captures(remotes))
            .map(|captures| captures[1].to_string());

        let Some(url) = url else {
            return Self::default();
        };
        Self {
            hub: capture(r"\w+@(.*?):.*?\.git", &url),
            slug: capture(r":(.*?)\.git", &url),
            url: Some(url),
        }
    }

    /// Hub name, `github.com` when unknown.
    pub fn hub_or_default(&self) -> &str {
        self.hub.as_deref().unwrap_or(DEFAULT_HUB)
    }
}

fn capture(pattern: &str, text: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(text)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REMOTES: &str = "origin\tgit@github.com:zencoder/zenflow.git (fetch)\n\
                           origin\tgit@github.com:zencoder/zenflow.git (push)\n\
                           backup\tgit@git.example.com:mirror/zenflow.git (push)\n";

    #[test]
    fn test_parses_origin() {
        let repo = RemoteRepository::parse(REMOTES, "origin");
        assert_eq!(repo.url.as_deref(), Some("git@github.com:zencoder/zenflow.git"));
        assert_eq!(repo.hub.as_deref(), Some("github.com"));
        assert_eq!(repo.slug.as_deref(), Some("zencoder/zenflow"));
    }

    #[test]
    fn test_parses_named_remote() {
        let repo = RemoteRepository::parse(REMOTES, "backup");
        assert_eq!(repo.hub.as_deref(), Some("git.example.com"));
        assert_eq!(repo.slug.as_deref(), Some("mirror/zenflow"));
    }

    #[test]
    fn test_missing_remote() {
        let repo = RemoteRepository::parse(REMOTES, "upstream");
        assert_eq!(repo, RemoteRepository::default());
        assert_eq!(repo.hub_or_default(), "github.com");
    }

    #[test]
    fn test_https_remote_has_no_hub() {
        let repo = RemoteRepository::parse("origin\thttps://github.com/a/b.git (fetch)\n", "origin");
        assert!(repo.url.is_some());
        assert_eq!(repo.hub, None);
    }
}
