//! Init workflow: interactive project setup.

use crate::changelog;
use crate::config::{ProjectSettings, ZenflowConfig};
use crate::error::{Result, ZenflowError};
use crate::log;
use crate::tools::fs::FsAdapter;
use zenflow_ask::{Ask, Question};

fn yes(ask: &dyn Ask, text: &str, default: &str) -> Result<bool> {
    let answer = ask.ask(
        &Question::new(text)
            .with_options(&["Y", "n"])
            .with_default(default),
    )?;
    Ok(answer == "y")
}

fn named(ask: &dyn Ask, text: &str, default: &str) -> Result<String> {
    Ok(ask.ask(&Question::new(text).with_default(default))?)
}

/// Asks whether to use an optional branch and, if so, its name.
fn optional_branch(ask: &dyn Ask, text: &str, default: &str) -> Result<Option<String>> {
    if !yes(ask, text, "Y")? {
        return Ok(None);
    }
    Ok(Some(named(ask, "What is the name of that branch?", default)?))
}

/// Builds `.zenflow.toml` by asking the operator.
///
/// This workflow:
/// 1. Refuses to replace an existing settings file unless confirmed
/// 2. Asks for the project name, branches, remotes and confirmation gates
/// 3. Offers to create the changelog when the project has none
/// 4. Writes the settings file
///
/// # Returns
///
/// The settings that were written. `config.settings` is updated too.
///
/// # Errors
///
/// Returns `ZenflowError::AlreadyConfigured` when overwriting is declined.
#[tracing::instrument(skip_all, fields(root = %config.repo_root.display()))]
pub fn init(config: &mut ZenflowConfig, ask: &dyn Ask, fs: &dyn FsAdapter) -> Result<ProjectSettings> {
    if fs.exists(&config.config_file) {
        log::error("Warning");
        let overwrite = ask.ask(
            &Question::new("There is an existing config file. Overwrite it?")
                .with_options(&["y", "N"])
                .with_default("N"),
        )?;
        if overwrite != "y" {
            return Err(ZenflowError::AlreadyConfigured(config.config_file.clone()));
        }
    }

    let mut settings = ProjectSettings::default();

    log::say("Project");
    settings.project = Some(ask.ask(&Question::new("What is the name of this project?").required())?);

    log::say("Branches");
    settings.development_branch = Some(named(
        ask,
        "What is the name of the main development branch?",
        "master",
    )?);
    settings.staging_branch =
        optional_branch(ask, "Use a branch for staging releases and hotfixes?", "staging")?;
    settings.qa_branch = optional_branch(ask, "Use a branch for testing features?", "qa")?;
    settings.release_branch = optional_branch(ask, "Use a release branch?", "production")?;

    log::say("Remotes");
    settings.remote = Some(named(ask, "What is the name of your primary remote?", "origin")?);
    if yes(ask, "Use a backup remote?", "n")? {
        settings.backup_remote = Some(named(ask, "What is the name of your backup remote?", "backup")?);
    }

    log::say("Confirmations");
    settings.confirm_staging = yes(ask, "Require deployment to a staging environment?", "Y")?;
    settings.confirm_review = yes(ask, "Require code reviews?", "Y")?;

    if !fs.exists(&config.changelog_file) {
        log::say("Changelog Management");
        if yes(ask, "Set up a changelog?", "Y")? {
            fs.write(&config.changelog_file, &changelog::template())?;
        }
    }

    fs.write(&config.config_file, &settings.to_toml()?)?;
    log::say(&format!("Wrote {}", config.config_file.display()));
    config.settings = settings.clone();
    Ok(settings)
}
