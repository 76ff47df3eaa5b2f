//! Mock pull request API for testing.

use crate::error::{Result, ZenflowError};
use crate::github::pull_request::{NewPullRequest, PullRequest, PullRequestApi};
use std::sync::{Arc, Mutex};

/// In-memory pull request API that records creations.
#[derive(Debug, Clone, Default)]
pub struct MockPullRequestApi {
    /// Open pull requests returned by `list`
    pulls: Arc<Mutex<Vec<PullRequest>>>,
    /// Response returned by `create`; a valid record is synthesized if unset
    create_response: Arc<Mutex<Option<PullRequest>>>,
    /// Every creation request, in order
    created: Arc<Mutex<Vec<NewPullRequest>>>,
}

impl MockPullRequestApi {
    /// Creates a mock with no open pull requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock listing `pulls`.
    pub fn with_pulls(pulls: Vec<PullRequest>) -> Self {
        let mock = Self::new();
        *mock.pulls.lock().unwrap() = pulls;
        mock
    }

    /// Sets the response for the next creations.
    pub fn set_create_response(&self, response: PullRequest) {
        *self.create_response.lock().unwrap() = Some(response);
    }

    /// Returns every creation request.
    pub fn created(&self) -> Vec<NewPullRequest> {
        self.created.lock().unwrap().clone()
    }
}

impl PullRequestApi for MockPullRequestApi {
    fn list(&self) -> Result<Vec<PullRequest>> {
        Ok(self.pulls.lock().unwrap().clone())
    }

    fn find(&self, number: u64) -> Result<PullRequest> {
        self.pulls
            .lock()
            .unwrap()
            .iter()
            .find(|pull| pull.number == number)
            .cloned()
            .ok_or_else(|| ZenflowError::GithubRequestFailed(format!("GET /pulls/{number}: 404")))
    }

    fn create(&self, request: &NewPullRequest) -> Result<PullRequest> {
        self.created.lock().unwrap().push(request.clone());
        if let Some(response) = self.create_response.lock().unwrap().clone() {
            return Ok(response);
        }

        let mut pulls = self.pulls.lock().unwrap();
        let number = pulls.len() as u64 + 1;
        let pull = PullRequest {
            title: Some(request.title.clone()),
            body: Some(request.body.clone()),
            ..PullRequest::open(
                number,
                &request.head,
                &format!("https://github.com/mock/repo/pull/{number}"),
            )
        };
        pulls.push(pull.clone());
        Ok(pull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_ref() {
        let api = MockPullRequestApi::with_pulls(vec![
            PullRequest::open(1, "feature/a", "https://github.com/x/y/pull/1"),
            PullRequest::open(2, "feature/b", "https://github.com/x/y/pull/2"),
        ]);

        let found = api.find_by_ref("feature/b", true).unwrap().unwrap();
        assert_eq!(found.number, 2);
        assert!(api.find_by_ref("feature/c", true).unwrap().is_none());
        assert_eq!(api.find(1).unwrap().head_ref(), Some("feature/a"));
    }

    #[test]
    fn test_strict_lookup_errors_when_missing() {
        let api = MockPullRequestApi::new();
        let err = api.find_by_ref_strict("feature/c").unwrap_err();

        assert_eq!(err.to_string(), "No open pull request was found for feature/c");
    }

    #[test]
    fn test_create_records_request() {
        let api = MockPullRequestApi::new();
        let request = NewPullRequest {
            base: "master".to_string(),
            head: "feature/a".to_string(),
            title: "feature: a".to_string(),
            body: "Adds a".to_string(),
        };

        let pull = api.create(&request).unwrap();

        assert!(pull.is_valid());
        assert_eq!(api.created(), vec![request]);
        assert!(api.exists("feature/a").unwrap());
    }
}
