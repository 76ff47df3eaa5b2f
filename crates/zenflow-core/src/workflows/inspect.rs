//! Read-only operations: branch listing, diff and compare view.

use crate::context::FlowContext;
use crate::error::{Result, ZenflowError};
use crate::log::{self, LogStyle};
use crate::repo::RemoteRepository;

/// Lists the local work branches of the flow.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn branches(ctx: &FlowContext<'_>) -> Result<Vec<String>> {
    let names = ctx.branches().list(ctx.name())?;
    log::say(&format!("Available {} branches:", ctx.name()));
    for name in &names {
        log::say_with(&format!("* {name}"), LogStyle::default().indented().plain());
    }
    Ok(names)
}

/// Opens the configured git difftool against the source branch.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn diff(ctx: &FlowContext<'_>) -> Result<()> {
    let source = ctx.flow.source()?;
    log::say(&format!("Displaying diff with {source}"));
    ctx.exec.run_streaming(&format!("git difftool {source}"))
}

/// Compare view url for the work branch.
///
/// # Errors
///
/// Returns `ZenflowError::UnknownRepository` when the remote url does not
/// name a repository.
pub fn compare_url(repository: &RemoteRepository, remote: &str, source: &str, work: &str) -> Result<String> {
    let slug = repository
        .slug
        .as_deref()
        .ok_or_else(|| ZenflowError::UnknownRepository(remote.to_string()))?;
    Ok(format!(
        "https://{}/{slug}/compare/{source}...{work}",
        repository.hub_or_default()
    ))
}

/// Opens the hosting compare view between the source and the work branch.
///
/// # Errors
///
/// Returns `ZenflowError::UnknownRepository` when the remote url does not
/// name a repository.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn compare(ctx: &FlowContext<'_>) -> Result<String> {
    let source = ctx.flow.source()?;
    let work = ctx.work_branch()?;
    let remote = ctx.config.remotes().primary;
    let repository = RemoteRepository::detect(ctx.exec, &remote)?;
    let url = compare_url(&repository, &remote, source, &work)?;

    log::say(&format!("Opening GitHub compare view for {source}...{work}"));
    ctx.open_url(&url)?;
    Ok(url)
}
