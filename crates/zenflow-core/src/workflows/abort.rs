//! Abort and publish workflows.

use crate::context::FlowContext;
use crate::error::Result;

/// Throws the work branch away without merging it.
///
/// Checks out the source branch, deletes the work branch from the remotes
/// (online only) and force-deletes it locally.
#[tracing::instrument(skip_all, fields(flow = %ctx.name(), offline = ctx.options.offline))]
pub fn abort(ctx: &FlowContext<'_>) -> Result<()> {
    let work = ctx.work_branch()?;
    let branches = ctx.branches();

    branches.checkout(ctx.flow.source()?)?;
    if ctx.online() {
        branches.delete_remote(&work)?;
    }
    branches.delete_local(&work, true)
}

/// Pushes the work branch and tracks it.
///
/// Needed after `start` under the rebase strategy, which keeps the branch
/// local.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn publish(ctx: &FlowContext<'_>) -> Result<()> {
    let work = ctx.work_branch()?;
    let branches = ctx.branches();

    branches.push(&work)?;
    branches.track(&work)
}
