//! Start workflow: create a work branch.

use crate::config::MergeStrategy;
use crate::context::FlowContext;
use crate::error::Result;

/// Creates `{flow}/{identifier}` from the flow's source branch.
///
/// This workflow:
/// 1. Takes the identifier from `name` or asks for one (validated, lower-cased)
/// 2. Online: pulls the source branch; offline: checks it out
/// 3. Creates the work branch from the source
/// 4. Online and not rebasing: pushes the work branch and tracks it
///
/// Under the rebase strategy the branch stays local until `publish`.
///
/// # Returns
///
/// The full work branch name.
///
/// # Errors
///
/// Returns `ZenflowError::BranchRoleMissing` if the flow has no source
/// branch, or `ZenflowError::Ask` if the prompt is interrupted.
#[tracing::instrument(skip_all, fields(flow = %ctx.name(), offline = ctx.options.offline))]
pub fn start(ctx: &FlowContext<'_>, name: Option<&str>) -> Result<String> {
    let source = ctx.flow.source()?;
    let identifier = ctx.prompt_identifier(name)?;
    let identifier = ctx.set_identifier(identifier);
    let work = ctx.flow.work_branch(identifier);
    let branches = ctx.branches();

    if ctx.online() {
        branches.update(source, ctx.options.rebase)?;
    } else {
        branches.checkout(source)?;
    }
    branches.create(&work, source)?;

    if ctx.online() && ctx.strategy() != MergeStrategy::Rebase {
        branches.push(&work)?;
        branches.track(&work)?;
    }

    tracing::info!(branch = %work, "work branch started");
    Ok(work)
}
