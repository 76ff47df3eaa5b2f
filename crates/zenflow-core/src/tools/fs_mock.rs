//! Mock file system adapter for testing.

use crate::error::{Result, ZenflowError};
use crate::tools::fs::FsAdapter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory file system that records every write.
///
/// # Examples
///
/// ```
/// use zenflow_core::tools::fs_mock::MockFsAdapter;
/// use zenflow_core::tools::fs::FsAdapter;
/// use std::path::Path;
///
/// let fs = MockFsAdapter::new();
/// fs.write(Path::new("/repo/CHANGELOG.md"), "* entry\n").unwrap();
/// assert_eq!(fs.read_to_string(Path::new("/repo/CHANGELOG.md")).unwrap(), "* entry\n");
/// assert_eq!(fs.write_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFsAdapter {
    /// In-memory file storage (path -> content)
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    /// Paths written, in order
    writes: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFsAdapter {
    /// Creates an empty mock file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one file without recording a write.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Returns a copy of every file.
    pub fn snapshot(&self) -> HashMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }

    /// Paths written through the adapter, in order.
    pub fn written(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of writes performed through the adapter.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl FsAdapter for MockFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ZenflowError::PathNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.writes.lock().unwrap().push(path.to_path_buf());
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}
