//! Configuration types for zenflow.
//!
//! Project settings live in `.zenflow.toml` at the repository root as a flat
//! record. Every key is optional; missing keys fall back to defaults.
//! File locations (version file, changelog, session log) are always derived
//! from the repository root and are never read from the settings file.

use crate::error::{Result, ZenflowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the settings file in the repository root.
pub const CONFIG_FILE_NAME: &str = ".zenflow.toml";

/// Name of the version file in the repository root.
pub const VERSION_FILE_NAME: &str = "VERSION.toml";

/// Name of the changelog in the repository root.
pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Name of the session log in the repository root.
pub const LOG_FILE_NAME: &str = ".zenflow-log";

/// Files older zenflow releases used, paired with their replacements.
pub const LEGACY_FILES: [(&str, &str); 2] = [
    (".zenflow", CONFIG_FILE_NAME),
    ("VERSION.yml", VERSION_FILE_NAME),
];

/// Remote used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Main zenflow configuration.
///
/// Holds the project settings together with the canonical paths derived
/// from the repository root.
#[derive(Debug, Clone)]
pub struct ZenflowConfig {
    /// Repository root directory; every command runs here.
    pub repo_root: PathBuf,

    /// Path to `.zenflow.toml`.
    pub config_file: PathBuf,

    /// Path to `VERSION.toml`.
    pub version_file: PathBuf,

    /// Path to `CHANGELOG.md`.
    pub changelog_file: PathBuf,

    /// Path to the append-only session log.
    pub log_file: PathBuf,

    /// Settings read from `.zenflow.toml`.
    pub settings: ProjectSettings,
}

impl ZenflowConfig {
    /// Creates a configuration with default settings.
    ///
    /// # Arguments
    ///
    /// * `repo_root` - The repository root directory.
    pub fn new(repo_root: PathBuf) -> Self {
        Self {
            config_file: repo_root.join(CONFIG_FILE_NAME),
            version_file: repo_root.join(VERSION_FILE_NAME),
            changelog_file: repo_root.join(CHANGELOG_FILE_NAME),
            log_file: repo_root.join(LOG_FILE_NAME),
            repo_root,
            settings: ProjectSettings::default(),
        }
    }

    /// Loads the configuration for a repository.
    ///
    /// A missing settings file is not an error: all defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ConfigParseError` if the file is not valid TOML
    /// or a value has the wrong type, or `ZenflowError::FileReadError` if the
    /// file exists but cannot be read.
    pub fn load(repo_root: PathBuf) -> Result<Self> {
        let mut config = Self::new(repo_root);
        if config.config_file.exists() {
            let content = std::fs::read_to_string(&config.config_file).map_err(|e| {
                ZenflowError::FileReadError(format!("{}: {}", config.config_file.display(), e))
            })?;
            config.settings = ProjectSettings::from_toml(&content)?;
        }
        Ok(config)
    }

    /// Legacy files present without their replacement, as
    /// `(legacy, replacement)` paths. These are not read.
    pub fn legacy_files(&self) -> Vec<(PathBuf, PathBuf)> {
        LEGACY_FILES
            .iter()
            .map(|(legacy, current)| (self.repo_root.join(legacy), self.repo_root.join(current)))
            .filter(|(legacy, current)| legacy.is_file() && !current.exists())
            .collect()
    }

    /// Whether a settings file exists for this repository.
    pub fn is_configured(&self) -> bool {
        self.config_file.exists()
    }

    /// Writes the settings to `.zenflow.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ConfigWriteError` if serialization fails or
    /// `ZenflowError::FileWriteError` if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let content = self.settings.to_toml()?;
        std::fs::write(&self.config_file, content).map_err(|e| {
            ZenflowError::FileWriteError(format!("{}: {}", self.config_file.display(), e))
        })
    }

    /// Remotes that pushes and remote deletions fan out to.
    pub fn remotes(&self) -> RemoteSet {
        RemoteSet {
            primary: self
                .settings
                .remote
                .clone()
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            backup: self.settings.backup_remote.clone(),
        }
    }

    /// Merge strategy for one operation.
    ///
    /// An explicit rebase request wins over the configured strategy, which
    /// wins over the default of merging.
    pub fn merge_strategy(&self, rebase_override: bool) -> MergeStrategy {
        if rebase_override {
            MergeStrategy::Rebase
        } else {
            self.settings.merge_strategy.unwrap_or_default()
        }
    }

    /// Directory the given relative file lives in, resolved from the root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.repo_root.join(relative)
    }
}

/// Flat project settings stored in `.zenflow.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Main development line (feature, bug, chore and release source).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_branch: Option<String>,

    /// Staging deploy branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_branch: Option<String>,

    /// QA deploy branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa_branch: Option<String>,

    /// Production line (hotfix source, release destination).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_branch: Option<String>,

    /// Primary remote, `origin` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// Optional second remote that mirrors every push.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_remote: Option<String>,

    /// How work branches integrate upstream changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<MergeStrategy>,

    /// Ask whether the branch was tested on staging before finishing.
    pub confirm_staging: bool,

    /// Ask whether the branch was reviewed before finishing.
    pub confirm_review: bool,

    /// Whether `deploy` is allowed.
    pub deployable: bool,

    /// Deploy command with `{target}` and `{task}` placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_command: Option<String>,

    /// Command used to open URLs, `open` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_command: Option<String>,
}

impl ProjectSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ConfigParseError` on invalid TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ZenflowError::ConfigParseError(e.to_string()))
    }

    /// Serializes settings to TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::ConfigWriteError` if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ZenflowError::ConfigWriteError(e.to_string()))
    }
}

/// How a work branch is brought up to date with another branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Merge commit (`git pull`, `git merge --no-ff`).
    #[default]
    Merge,

    /// Rebase (`git pull --rebase`, `git rebase`).
    Rebase,
}

impl MergeStrategy {
    /// Returns the configuration spelling of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Merge => "merge",
            MergeStrategy::Rebase => "rebase",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remotes targeted by pushes and remote branch deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSet {
    /// Always targeted.
    pub primary: String,

    /// Targeted after the primary when configured.
    pub backup: Option<String>,
}

impl Default for RemoteSet {
    fn default() -> Self {
        Self {
            primary: DEFAULT_REMOTE.to_string(),
            backup: None,
        }
    }
}
