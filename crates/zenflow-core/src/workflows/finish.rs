//! Finish workflow: integrate the work branch and retire it.

use crate::changelog::ChangelogUpdate;
use crate::context::FlowContext;
use crate::error::{Result, ZenflowError};
use crate::flow::{ChangelogPolicy, Role};
use crate::log;
use zenflow_ask::Question;

/// Roles the work branch is merged into, in order.
const MERGE_ROLES: [Role; 3] = [Role::Source, Role::Destination, Role::SecondaryDestination];

/// Asks a `[Y/n]` confirmation and fails with `refusal` on "n".
fn confirm(ctx: &FlowContext<'_>, text: &str, refusal: &str) -> Result<()> {
    let answer = ctx.tools.ask.ask(
        &Question::new(text)
            .with_options(&["Y", "n"])
            .with_default("Y"),
    )?;
    if answer == "n" {
        log::error(refusal);
        return Err(ZenflowError::ConfirmationDeclined(refusal.to_string()));
    }
    Ok(())
}

/// Finishes the work branch of a flow.
///
/// This workflow:
/// 1. Runs the configured confirmation gates (staging, then review)
/// 2. Pulls the destination and brings the work branch up to date with the
///    destination and the secondary destination
/// 3. Bumps the version and updates the changelog when the flow asks for it
/// 4. Merges the work branch into source, destination and secondary
///    destination, pushing each one when online
/// 5. Tags the release with the new version when the flow tags
/// 6. Deletes the work branch, remotely when online, then locally
///
/// # Errors
///
/// Returns `ZenflowError::ConfirmationDeclined` before any git command when
/// a gate is answered "n", and `ZenflowError::VersionFileMissing` if the
/// flow bumps versions and the project has no version file.
#[tracing::instrument(skip_all, fields(flow = %ctx.name(), offline = ctx.options.offline))]
pub fn finish(ctx: &FlowContext<'_>) -> Result<()> {
    let identifier = ctx.identifier()?.to_string();
    let work = ctx.flow.work_branch(&identifier);
    let settings = &ctx.config.settings;

    if settings.confirm_staging {
        confirm(
            ctx,
            "Has this been tested in a staging environment first?",
            "Sorry, deploy to a staging environment first",
        )?;
    }
    if settings.confirm_review {
        confirm(
            ctx,
            "Has this been code reviewed yet?",
            "Please have someone look at this first",
        )?;
    }

    let branches = ctx.branches();
    let destination = ctx.flow.destination()?;
    if ctx.online() {
        branches.update(destination, ctx.options.rebase)?;
    }
    branches.apply_merge_strategy(ctx.name(), &identifier, destination, ctx.options.rebase)?;
    if let Some(secondary) = ctx.flow.optional_branch(Role::SecondaryDestination)? {
        branches.apply_merge_strategy(ctx.name(), &identifier, secondary, ctx.options.rebase)?;
    }

    if let Some(level) = ctx.flow.version() {
        ctx.versions().update(level)?;
    }

    let mut change = None;
    let policy = ctx.flow.changelog();
    if policy.is_enabled() {
        change = ctx.changelog().update(&ChangelogUpdate {
            rotate: policy == ChangelogPolicy::Rotate,
            name: Some(identifier.clone()),
            required: true,
        })?;
    }

    for role in MERGE_ROLES {
        let Some(target) = ctx.flow.optional_branch(role)? else {
            continue;
        };
        branches.checkout(target)?;
        branches.merge(&work)?;
        if ctx.online() {
            branches.push(target)?;
        }
    }

    if ctx.flow.tag() {
        let version = ctx.versions().current()?.to_string();
        branches.tag(Some(&version), change.as_deref())?;
        if ctx.online() {
            branches.push_tags()?;
        }
    }

    if ctx.online() {
        branches.delete_remote(&work)?;
    }
    branches.delete_local(&work, true)?;

    tracing::info!(branch = %work, failed = ctx.exec.failed(), "finish complete");
    Ok(())
}
