//! Pull request resources and the API boundary.

use crate::error::{Result, ZenflowError};
use crate::log;
use serde::{Deserialize, Serialize};

/// One entry of the `errors` array returned on failed creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable problem description.
    #[serde(default)]
    pub message: String,
}

/// Branch reference of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRef {
    /// Branch name.
    #[serde(rename = "ref", default)]
    pub ref_name: String,
}

/// A pull request as returned by the hosting API.
///
/// Failed creations come back as the same shape with `errors` or `message`
/// set and no `html_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    #[serde(default)]
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description.
    #[serde(default)]
    pub body: Option<String>,
    /// Branch the work is merged into.
    #[serde(default)]
    pub base: Option<PullRef>,
    /// Work branch.
    #[serde(default)]
    pub head: Option<PullRef>,
    /// Browser location.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiError>>,
    /// Top-level failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PullRequest {
    /// Creates an open pull request record for `head_ref`.
    pub fn open(number: u64, head_ref: &str, html_url: &str) -> Self {
        Self {
            number,
            head: Some(PullRef {
                ref_name: head_ref.to_string(),
            }),
            html_url: Some(html_url.to_string()),
            ..Default::default()
        }
    }

    /// True when the response carries no errors and has a location.
    pub fn is_valid(&self) -> bool {
        self.errors.is_none() && self.html_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Head branch name.
    pub fn head_ref(&self) -> Option<&str> {
        self.head.as_ref().map(|head| head.ref_name.as_str())
    }

    /// Explains why creation failed.
    ///
    /// Structured errors win (with a leading `base` stripped from each),
    /// then the flat message, then a generic diagnostic.
    pub fn failure_messages(&self) -> Vec<String> {
        if let Some(errors) = &self.errors {
            return errors
                .iter()
                .map(|error| strip_base_prefix(&error.message))
                .collect();
        }
        if let Some(message) = &self.message {
            return vec![message.clone()];
        }
        vec!["unexpected failure, both 'errors' and 'message' were empty in the response".to_string()]
    }
}

fn strip_base_prefix(message: &str) -> String {
    match message.strip_prefix("base") {
        Some(rest) => rest.trim_start().to_string(),
        None => message.to_string(),
    }
}

/// Body of a pull request creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    /// Branch to merge into.
    pub base: String,
    /// Work branch.
    pub head: String,
    /// Title.
    pub title: String,
    /// Description.
    pub body: String,
}

/// Access to the pull requests of the current repository.
pub trait PullRequestApi: Send + Sync {
    /// Open pull requests in the order the API returns them.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
    fn list(&self) -> Result<Vec<PullRequest>>;

    /// Fetches one pull request by number.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
    fn find(&self, number: u64) -> Result<PullRequest>;

    /// Creates a pull request; failures come back as an invalid record.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
    fn create(&self, request: &NewPullRequest) -> Result<PullRequest>;

    /// First open pull request whose head is `reference`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
    fn find_by_ref(&self, reference: &str, silent: bool) -> Result<Option<PullRequest>> {
        if !silent {
            log::say(&format!("Looking up pull request for {reference}"));
        }
        Ok(self
            .list()?
            .into_iter()
            .find(|pull| pull.head_ref() == Some(reference)))
    }

    /// Like [`find_by_ref`](Self::find_by_ref) but a missing pull request is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::PullRequestNotFound` when nothing matches.
    fn find_by_ref_strict(&self, reference: &str) -> Result<PullRequest> {
        self.find_by_ref(reference, false)?
            .ok_or_else(|| ZenflowError::PullRequestNotFound(reference.to_string()))
    }

    /// Whether an open pull request exists for `reference`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
    fn exists(&self, reference: &str) -> Result<bool> {
        Ok(self.find_by_ref(reference, true)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_api_listing() {
        let body = r#"[
            {"number": 7, "title": "feature: login", "html_url": "https://github.com/zen/app/pull/7",
             "head": {"ref": "feature/login", "sha": "abc"}, "base": {"ref": "master"}}
        ]"#;
        let pulls: Vec<PullRequest> = serde_json::from_str(body).unwrap();

        assert_eq!(pulls[0].number, 7);
        assert_eq!(pulls[0].head_ref(), Some("feature/login"));
        assert!(pulls[0].is_valid());
    }

    #[test]
    fn test_structured_errors_win() {
        let body = r#"{"message": "Validation Failed",
            "errors": [{"resource": "PullRequest", "message": "base No commits between master and feature/x"}]}"#;
        let pull: PullRequest = serde_json::from_str(body).unwrap();

        assert!(!pull.is_valid());
        assert_eq!(
            pull.failure_messages(),
            vec!["No commits between master and feature/x"]
        );
    }

    #[test]
    fn test_message_used_without_errors() {
        let pull: PullRequest = serde_json::from_str(r#"{"message": "Bad credentials"}"#).unwrap();

        assert!(!pull.is_valid());
        assert_eq!(pull.failure_messages(), vec!["Bad credentials"]);
    }

    #[test]
    fn test_unexpected_failure() {
        let pull: PullRequest = serde_json::from_str("{}").unwrap();

        assert!(!pull.is_valid());
        assert_eq!(
            pull.failure_messages(),
            vec!["unexpected failure, both 'errors' and 'message' were empty in the response"]
        );
    }

    #[test]
    fn test_empty_url_is_invalid() {
        let pull = PullRequest::open(1, "feature/a", "");
        assert!(!pull.is_valid());
    }
}
