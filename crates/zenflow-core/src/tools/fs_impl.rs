//! Standard file system adapter implementation.

use crate::error::{Result, ZenflowError};
use crate::tools::fs::FsAdapter;
use std::path::Path;

/// File system adapter backed by `std::fs`.
#[derive(Debug, Default)]
pub struct StdFsAdapter;

impl StdFsAdapter {
    /// Creates a new standard file system adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FsAdapter for StdFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ZenflowError::PathNotFound(path.to_path_buf())
            } else {
                ZenflowError::FileReadError(format!("{}: {}", path.display(), e))
            }
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ZenflowError::PermissionDenied(path.display().to_string())
            } else {
                ZenflowError::FileWriteError(format!("{}: {}", path.display(), e))
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VERSION.toml");
        let adapter = StdFsAdapter::new();

        assert!(!adapter.exists(&path));
        adapter.write(&path, "major = 1\n").unwrap();
        assert!(adapter.exists(&path));
        assert_eq!(adapter.read_to_string(&path).unwrap(), "major = 1\n");
    }

    #[test]
    fn test_read_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = StdFsAdapter::new();

        assert!(matches!(
            adapter.read_to_string(&dir.path().join("CHANGELOG.md")),
            Err(ZenflowError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!StdFsAdapter::new().exists(dir.path()));
    }
}
