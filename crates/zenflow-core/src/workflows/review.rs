//! Review workflow: open a pull request for the work branch.

use crate::context::FlowContext;
use crate::error::{Result, ZenflowError};
use crate::github::{NewPullRequest, PullRequest, PullRequestApi};
use crate::log::{self, LogStyle};
use zenflow_ask::Question;

/// Opens a pull request from the work branch against the flow's source.
///
/// This workflow:
/// 1. Refuses when a pull request for the work branch is already open
/// 2. Asks for a description
/// 3. Creates the pull request titled `{flow}: {identifier}`
/// 4. Reports API errors, or opens the new pull request in the browser
///
/// # Returns
///
/// The API response. A response with errors is returned as `Ok` after
/// the errors have been shown.
///
/// # Errors
///
/// Returns `ZenflowError::PullRequestExists` when one is already open, or
/// `ZenflowError::GithubRequestFailed` if the API is unreachable.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn review(ctx: &FlowContext<'_>) -> Result<PullRequest> {
    let source = ctx.flow.source()?;
    let identifier = ctx.identifier()?.to_string();
    let work = ctx.flow.work_branch(&identifier);
    let pulls = ctx.tools.pulls.as_ref();

    if let Some(existing) = pulls.find_by_ref(&work, false)? {
        return Err(ZenflowError::PullRequestExists {
            reference: work,
            html_url: existing.html_url.unwrap_or_default(),
        });
    }

    let description = ctx.tools.ask.ask(
        &Question::new(format!("Describe this {}:", ctx.name())).required(),
    )?;
    let request = NewPullRequest {
        base: source.to_string(),
        head: work.clone(),
        title: format!("{}: {identifier}", ctx.name()),
        body: description,
    };
    let pull = pulls.create(&request)?;

    if !pull.is_valid() {
        log::error("There was a problem creating the pull request:");
        for message in pull.failure_messages() {
            log::say_with(&format!("* {message}"), LogStyle::error().indented());
        }
        tracing::warn!(head = %work, "pull request rejected");
        return Ok(pull);
    }

    let url = pull.html_url.clone().unwrap_or_default();
    log::say("Pull request was created!");
    log::say_with(&url, LogStyle::default().indented().plain());
    ctx.open_url(&url)?;
    Ok(pull)
}

/// Prints open pull requests as `#number  head-ref` rows.
///
/// # Errors
///
/// Returns `ZenflowError::GithubRequestFailed` if the API is unreachable.
#[tracing::instrument(skip_all)]
pub fn list_reviews(pulls: &dyn PullRequestApi) -> Result<Vec<PullRequest>> {
    let open = pulls.list()?;
    if open.is_empty() {
        log::say("No open pull requests");
        return Ok(open);
    }
    log::say("Open pull requests:");
    for pull in &open {
        let row = format!("#{:<6} {}", pull.number, pull.head_ref().unwrap_or("?"));
        log::say_with(&row, LogStyle::default().indented().plain());
    }
    Ok(open)
}
