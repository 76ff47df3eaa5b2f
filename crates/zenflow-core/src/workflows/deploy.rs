//! Deploy workflow and the deploy hook.

use crate::branch::Branches;
use crate::config::ZenflowConfig;
use crate::context::FlowContext;
use crate::error::{Result, ZenflowError};
use crate::exec::{ExecutionContext, RunOptions};
use crate::flow::Role;
use crate::log;
use crate::tools::fs::FsAdapter;

/// Command that deploys `target`.
///
/// `deploy_command` (with `{target}` and `{task}` placeholders) wins over
/// the default Capistrano invocation, which is prefixed with
/// `bundle exec` when the project has a Gemfile.
pub fn deploy_command(config: &ZenflowConfig, fs: &dyn FsAdapter, target: &str, migrations: bool) -> String {
    let task = if migrations { "deploy:migrations" } else { "deploy" };
    if let Some(template) = &config.settings.deploy_command {
        return template.replace("{target}", target).replace("{task}", task);
    }
    let bundle_exec = if fs.exists(&config.path("Gemfile")) {
        "bundle exec "
    } else {
        ""
    };
    format!("{bundle_exec}cap {target} {task}")
}

/// Pushes `target` and runs the deploy command for it.
///
/// # Errors
///
/// Returns `ZenflowError::ShellCommandFailed` only if the shell cannot be
/// started.
#[tracing::instrument(skip(exec, branches, fs, config))]
pub fn deploy_to(
    exec: &ExecutionContext,
    branches: &Branches<'_>,
    fs: &dyn FsAdapter,
    config: &ZenflowConfig,
    target: &str,
    migrations: bool,
) -> Result<()> {
    branches.push(target)?;
    if migrations {
        log::say(&format!("Deploying with migrations to {target}"));
    } else {
        log::say(&format!("Deploying to {target}"));
    }
    exec.run(
        &deploy_command(config, fs, target, migrations),
        RunOptions::default(),
    )?;
    Ok(())
}

/// Merges the work branch into each deploy branch and deploys it.
///
/// Targets are handled one after the other; the work branch is checked out
/// again at the end.
///
/// # Errors
///
/// Returns `ZenflowError::NotDeployable` before touching git when the
/// project is not deployable.
#[tracing::instrument(skip_all, fields(flow = %ctx.name(), migrations = ctx.options.migrations))]
pub fn deploy(ctx: &FlowContext<'_>) -> Result<()> {
    if !ctx.config.settings.deployable {
        return Err(ZenflowError::NotDeployable);
    }

    let work = ctx.work_branch()?;
    let branches = ctx.branches();
    for target in ctx.flow.all_branches(Role::Deploy) {
        branches.update(target, false)?;
        branches.merge(&work)?;
        deploy_to(
            ctx.exec,
            &branches,
            ctx.tools.fs.as_ref(),
            ctx.config,
            target,
            ctx.options.migrations,
        )?;
    }
    branches.checkout(&work)
}
