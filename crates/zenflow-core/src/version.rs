//! Project version management.
//!
//! The version lives in `VERSION.toml` as a flat record:
//!
//! ```toml
//! major = 1
//! minor = 2
//! patch = 4
//! pre = "rc"
//! ```

use crate::error::{Result, ZenflowError};
use crate::exec::{ExecutionContext, RunOptions};
use crate::log;
use crate::tools::fs::FsAdapter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Semantic version with an optional opaque pre-release tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Pre-release tag such as `rc2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
}

impl Version {
    /// Creates a version.
    pub fn new(major: u64, minor: u64, patch: u64, pre: Option<&str>) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: pre.map(str::to_string),
        }
    }

    /// Returns the next version at `level`.
    ///
    /// Lower components reset to zero and the pre-release tag is dropped.
    /// Returns `None` when the bumped component would overflow.
    #[must_use]
    pub fn bump(&self, level: VersionLevel) -> Option<Self> {
        let next = match level {
            VersionLevel::Major => Self::new(self.major.checked_add(1)?, 0, 0, None),
            VersionLevel::Minor => Self::new(self.major, self.minor.checked_add(1)?, 0, None),
            VersionLevel::Patch => {
                Self::new(self.major, self.minor, self.patch.checked_add(1)?, None)
            }
        };
        Some(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, ".{pre}")?;
        }
        Ok(())
    }
}

/// Component incremented by a bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionLevel {
    /// Breaking release.
    Major,
    /// Feature release.
    Minor,
    /// Fix release.
    Patch,
}

impl fmt::Display for VersionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionLevel::Major => "major",
            VersionLevel::Minor => "minor",
            VersionLevel::Patch => "patch",
        };
        write!(f, "{name}")
    }
}

impl FromStr for VersionLevel {
    type Err = ZenflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionLevel::Major),
            "minor" => Ok(VersionLevel::Minor),
            "patch" => Ok(VersionLevel::Patch),
            other => Err(ZenflowError::InvalidVersionLevel(other.to_string())),
        }
    }
}

/// Reads, bumps and commits the version file.
pub struct VersionManager<'a> {
    fs: &'a dyn FsAdapter,
    exec: &'a ExecutionContext,
    path: PathBuf,
}

impl<'a> VersionManager<'a> {
    /// Creates a manager for the version file at `path`.
    pub fn new(fs: &'a dyn FsAdapter, exec: &'a ExecutionContext, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            exec,
            path: path.into(),
        }
    }

    /// Location of the version file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the version on disk.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::VersionFileMissing` if there is no version file
    /// or `ZenflowError::CorruptedVersion` if it cannot be parsed.
    pub fn current(&self) -> Result<Version> {
        if !self.fs.exists(&self.path) {
            return Err(ZenflowError::VersionFileMissing(self.path.clone()));
        }
        let content = self.fs.read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| ZenflowError::CorruptedVersion {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Writes `version` to the version file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, version: &Version) -> Result<()> {
        let content = toml::to_string(version)
            .map_err(|e| ZenflowError::FileWriteError(format!("{}: {}", self.path.display(), e)))?;
        self.fs.write(&self.path, &content)
    }

    /// Bumps the version, writes it and commits the version file.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::VersionFileMissing` if there is no version file
    /// and `ZenflowError::CorruptedVersion` if the component at `level` is
    /// already at its maximum.
    #[tracing::instrument(skip(self))]
    pub fn update(&self, level: VersionLevel) -> Result<Version> {
        let current = self.current()?;
        let next = current
            .bump(level)
            .ok_or_else(|| ZenflowError::CorruptedVersion {
                path: self.path.clone(),
                message: format!("{level} component of {current} cannot be incremented"),
            })?;
        self.save(&next)?;
        log::say(&format!("Bumping version to {next}"));

        let file = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::config::VERSION_FILE_NAME.to_string());
        self.exec.run(
            &format!("git add {file} && git commit -m 'Bumping version to {next}.'"),
            RunOptions::default(),
        )?;
        Ok(next)
    }
}
