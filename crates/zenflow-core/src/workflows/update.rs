//! Update workflow: bring the work branch up to date with its source.

use crate::context::FlowContext;
use crate::error::Result;

/// Pulls the source branch (online only) and integrates it into the work
/// branch using the effective merge strategy.
///
/// # Errors
///
/// Returns `ZenflowError::BranchRoleMissing` if the flow has no source
/// branch, or `ZenflowError::Ask` if the identifier prompt is interrupted.
#[tracing::instrument(skip_all, fields(flow = %ctx.name()))]
pub fn update(ctx: &FlowContext<'_>) -> Result<()> {
    let source = ctx.flow.source()?;
    let identifier = ctx.identifier()?;
    let branches = ctx.branches();

    if ctx.online() {
        branches.update(source, ctx.options.rebase)?;
    }
    branches.apply_merge_strategy(ctx.name(), identifier, source, ctx.options.rebase)
}
