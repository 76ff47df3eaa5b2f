//! File system adapter trait.
//!
//! The version file and the changelog are read and written through this
//! trait so their managers can be tested against an in-memory store.

use crate::error::Result;
use std::path::Path;

/// File system adapter trait.
pub trait FsAdapter: Send + Sync {
    /// Reads the contents of a file as a string.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::PathNotFound` if the file doesn't exist or
    /// `ZenflowError::FileReadError` if reading fails.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Writes a string to a file, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::PermissionDenied` if lacking write permissions
    /// or `ZenflowError::FileWriteError` if writing fails.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Checks if a file exists.
    fn exists(&self, path: &Path) -> bool;
}
