//! Integration tests for version and changelog files on disk.

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use zenflow_ask::ScriptedAsk;
use zenflow_core::changelog::{self, ChangelogManager, ChangelogUpdate};
use zenflow_core::tools::fs_impl::StdFsAdapter;
use zenflow_core::tools::shell_mock::MockShellAdapter;
use zenflow_core::{ExecutionContext, VersionLevel, VersionManager};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

#[test]
fn test_create_then_update_puts_entry_first() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("CHANGELOG.md");
    let fs_adapter = StdFsAdapter::new();
    let shell = MockShellAdapter::with_success();
    let exec = ExecutionContext::new(Box::new(shell.clone()), None);
    let ask = ScriptedAsk::new(["X"]);
    let versions = VersionManager::new(&fs_adapter, &exec, temp_dir.path().join("VERSION.toml"));
    let manager = ChangelogManager::new(&fs_adapter, &exec, &ask, versions, &path).with_today(date());

    manager.create().unwrap();
    let change = manager
        .update(&ChangelogUpdate {
            required: true,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(change.as_deref(), Some("X"));
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next(), Some("* X"));
    assert_eq!(changelog::split(&content).0, "* X");
    assert_eq!(
        shell.commands(),
        vec!["git add CHANGELOG.md && git commit -m 'Adding line to CHANGELOG: * X'"]
    );
}

#[test]
fn test_rotation_is_idempotent_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("CHANGELOG.md");
    fs::write(
        temp_dir.path().join("VERSION.toml"),
        "major = 0\nminor = 9\npatch = 1\n",
    )
    .unwrap();
    fs::write(&path, format!("* Added search\n\n{}", changelog::template())).unwrap();

    let fs_adapter = StdFsAdapter::new();
    let shell = MockShellAdapter::with_success();
    let exec = ExecutionContext::new(Box::new(shell.clone()), None);
    let ask = ScriptedAsk::default();
    let versions = VersionManager::new(&fs_adapter, &exec, temp_dir.path().join("VERSION.toml"));
    let manager = ChangelogManager::new(&fs_adapter, &exec, &ask, versions, &path).with_today(date());

    assert!(manager.rotate(Some("search"), true).unwrap());
    let rotated = fs::read_to_string(&path).unwrap();
    assert!(rotated.contains(&changelog::row_name("0.9.1", date(), Some("search"))));
    assert!(changelog::split(&rotated).0.is_empty());

    assert!(!manager.rotate(None, true).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), rotated);
    assert_eq!(
        shell.commands(),
        vec!["git add CHANGELOG.md && git commit -m 'Rotating CHANGELOG.'"]
    );
}

#[test]
fn test_version_update_writes_and_commits() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("VERSION.toml");
    fs::write(&path, "major = 1\nminor = 2\npatch = 4\npre = \"rc\"\n").unwrap();

    let fs_adapter = StdFsAdapter::new();
    let shell = MockShellAdapter::with_success();
    let exec = ExecutionContext::new(Box::new(shell.clone()), None);
    let versions = VersionManager::new(&fs_adapter, &exec, &path);

    let next = versions.update(VersionLevel::Minor).unwrap();

    assert_eq!(next.to_string(), "1.3.0");
    assert_eq!(versions.current().unwrap(), next);
    assert_eq!(
        shell.commands(),
        vec!["git add VERSION.toml && git commit -m 'Bumping version to 1.3.0.'"]
    );
}
