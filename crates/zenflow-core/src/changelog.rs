//! Changelog management.
//!
//! `CHANGELOG.md` is split by a line of 80 dashes. Text above the first
//! delimiter is pending: entries added since the last release. Rotation
//! moves pending entries into a dated block under the `CHANGELOG` header,
//! newest block first.

use crate::error::Result;
use crate::exec::{ExecutionContext, RunOptions, shell_escape_for_single_quoting};
use crate::log;
use crate::tools::fs::FsAdapter;
use crate::version::VersionManager;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use zenflow_ask::{Ask, Question};

/// Width of the delimiter and of history rows.
pub const LINE_WIDTH: usize = 80;

const HEADER_RULE: &str = "\n=========";

/// The delimiter line separating pending changes from history.
pub fn delimiter() -> String {
    "-".repeat(LINE_WIDTH)
}

/// Template written by [`ChangelogManager::create`].
pub fn template() -> String {
    let delimiter = delimiter();
    format!("{delimiter}\n  ^ ADD NEW CHANGES ABOVE ^\n{delimiter}\n\n  CHANGELOG\n=========\n\n")
}

/// Options for [`ChangelogManager::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogUpdate {
    /// Rotate pending changes into a history block.
    pub rotate: bool,
    /// Work item the history block is annotated with.
    pub name: Option<String>,
    /// Whether the operator must enter a line.
    pub required: bool,
}

/// Splits a changelog into its trimmed pending region and the rest.
pub fn split(content: &str) -> (&str, &str) {
    let content = content.trim();
    match content.find(&delimiter()) {
        Some(index) => (content[..index].trim(), &content[index..]),
        None => (content, ""),
    }
}

/// Heading of a history block, padded with dashes to the line width.
pub fn row_name(version: &str, date: NaiveDate, name: Option<&str>) -> String {
    let mut row = format!("---- {version} / {} ", date.format("%Y-%m-%d"));
    if let Some(name) = name {
        row.push_str(&format!("/ {name} "));
    }
    while row.chars().count() < LINE_WIDTH {
        row.push('-');
    }
    row
}

fn prepended(content: &str, entry: &str) -> String {
    let (pending, rest) = split(content);
    if pending.is_empty() {
        format!("{entry}\n\n{rest}\n")
    } else {
        format!("{entry}\n{pending}\n\n{rest}\n")
    }
}

fn rotated(content: &str, row: &str) -> Option<String> {
    let (pending, rest) = split(content);
    if pending.is_empty() {
        return None;
    }
    let block = format!("{row}\n{pending}\n");

    let Some(index) = rest.find(HEADER_RULE) else {
        return Some(format!("{rest}\n\n{block}"));
    };
    let rule = &rest[index + 1..];
    let rule_len = rule.len() - rule.trim_start_matches('=').len();
    let (head, tail) = rest.split_at(index + 1 + rule_len);
    let tail = tail.trim_start_matches('\n');

    let mut out = format!("{head}\n\n{block}");
    if !tail.trim().is_empty() {
        out.push('\n');
        out.push_str(tail.trim_end());
        out.push('\n');
    }
    Some(out)
}

/// Reads and rewrites the changelog and commits the result.
pub struct ChangelogManager<'a> {
    fs: &'a dyn FsAdapter,
    exec: &'a ExecutionContext,
    ask: &'a dyn Ask,
    version: VersionManager<'a>,
    path: PathBuf,
    today: NaiveDate,
}

impl<'a> ChangelogManager<'a> {
    /// Creates a manager for the changelog at `path`, dating history blocks
    /// with the local date.
    pub fn new(
        fs: &'a dyn FsAdapter,
        exec: &'a ExecutionContext,
        ask: &'a dyn Ask,
        version: VersionManager<'a>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            exec,
            ask,
            version,
            path: path.into(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Overrides the date used for history blocks.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Location of the changelog.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the project keeps a changelog.
    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Asks for one changelog line, prepends it and commits.
    ///
    /// Without a line, a rotating update still rotates and commits pending
    /// entries. Nothing happens when the project has no changelog.
    ///
    /// # Returns
    ///
    /// The line entered by the operator, if any.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::Ask` if prompting fails and
    /// `ZenflowError::VersionFileMissing` when rotating without a version
    /// file.
    #[tracing::instrument(skip_all, fields(rotate = options.rotate))]
    pub fn update(&self, options: &ChangelogUpdate) -> Result<Option<String>> {
        if !self.exists() {
            tracing::debug!(path = %self.path.display(), "no changelog");
            return Ok(None);
        }

        let text = if options.required {
            "Add one line to the changelog:"
        } else {
            "Add one line to the changelog (optional):"
        };
        let change = self
            .ask
            .ask(&Question::new(text).with_required(options.required))?;
        let change = change.trim();

        if !change.is_empty() {
            self.prepend(&format!("* {change}"), options)?;
            return Ok(Some(change.to_string()));
        }
        if options.rotate {
            self.rotate(None, true)?;
        }
        Ok(None)
    }

    fn prepend(&self, entry: &str, options: &ChangelogUpdate) -> Result<()> {
        let content = self.fs.read_to_string(&self.path)?;
        self.fs.write(&self.path, &prepended(&content, entry))?;
        if options.rotate {
            self.rotate(options.name.as_deref(), false)?;
        }
        self.exec.run(
            &format!(
                "git add {} && git commit -m 'Adding line to CHANGELOG: {}'",
                self.file_name(),
                shell_escape_for_single_quoting(entry)
            ),
            RunOptions::default(),
        )?;
        Ok(())
    }

    /// Moves pending entries into a history block.
    ///
    /// # Returns
    ///
    /// `false`, without touching the file, when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns `ZenflowError::VersionFileMissing` if the version file is
    /// missing.
    pub fn rotate(&self, name: Option<&str>, commit: bool) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        let content = self.fs.read_to_string(&self.path)?;
        if split(&content).0.is_empty() {
            tracing::debug!("nothing pending, skipping rotation");
            return Ok(false);
        }

        let version = self.version.current()?;
        let row = row_name(&version.to_string(), self.today, name);
        let Some(rotated) = rotated(&content, &row) else {
            return Ok(false);
        };

        let mut heading = format!("{version} / {}", self.today.format("%Y-%m-%d"));
        if let Some(name) = name {
            heading.push_str(&format!(" /{name}"));
        }
        log::say(&format!("Managing changelog for version {heading}"));

        self.fs.write(&self.path, &rotated)?;
        if commit {
            self.exec.run(
                &format!(
                    "git add {} && git commit -m 'Rotating CHANGELOG.'",
                    self.file_name()
                ),
                RunOptions::default(),
            )?;
        }
        Ok(true)
    }

    /// Writes the empty changelog template.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn create(&self) -> Result<()> {
        self.fs.write(&self.path, &template())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::config::CHANGELOG_FILE_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fs_mock::MockFsAdapter;
    use crate::tools::shell_mock::MockShellAdapter;
    use zenflow_ask::ScriptedAsk;

    const CHANGELOG: &str = "/repo/CHANGELOG.md";
    const VERSION: &str = "/repo/VERSION.toml";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    struct Fixture {
        fs: MockFsAdapter,
        shell: MockShellAdapter,
        exec: ExecutionContext,
        ask: ScriptedAsk,
    }

    impl Fixture {
        fn new(answers: &[&str]) -> Self {
            let fs = MockFsAdapter::new();
            fs.insert(VERSION, "major = 0\nminor = 3\npatch = 1\n");
            let shell = MockShellAdapter::with_success();
            let exec = ExecutionContext::new(Box::new(shell.clone()), None);
            Self {
                fs,
                shell,
                exec,
                ask: ScriptedAsk::new(answers.iter().copied()),
            }
        }

        fn manager(&self) -> ChangelogManager<'_> {
            let version = VersionManager::new(&self.fs, &self.exec, VERSION);
            ChangelogManager::new(&self.fs, &self.exec, &self.ask, version, CHANGELOG)
                .with_today(date())
        }

        fn content(&self) -> String {
            self.fs.read_to_string(Path::new(CHANGELOG)).unwrap()
        }
    }

    #[test]
    fn test_template_layout() {
        let text = template();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], delimiter());
        assert_eq!(lines[1], "  ^ ADD NEW CHANGES ABOVE ^");
        assert_eq!(lines[2], delimiter());
        assert_eq!(lines[4], "  CHANGELOG");
        assert_eq!(lines[5], "=========");
    }

    #[test]
    fn test_row_name_is_padded() {
        let row = row_name("1.2.5", date(), Some("my-fix"));
        assert!(row.starts_with("---- 1.2.5 / 2024-03-09 / my-fix ---"));
        assert_eq!(row.len(), LINE_WIDTH);

        let row = row_name("1.2.5", date(), None);
        assert!(row.starts_with("---- 1.2.5 / 2024-03-09 ---"));
        assert_eq!(row.len(), LINE_WIDTH);
    }

    #[test]
    fn test_create_then_update_puts_entry_first() {
        let fixture = Fixture::new(&["X"]);
        let manager = fixture.manager();
        manager.create().unwrap();

        let change = manager
            .update(&ChangelogUpdate {
                required: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(change.as_deref(), Some("X"));
        let content = fixture.content();
        assert_eq!(content.lines().next(), Some("* X"));
        assert_eq!(split(&content).0, "* X");
        assert_eq!(
            fixture.shell.commands(),
            vec!["git add CHANGELOG.md && git commit -m 'Adding line to CHANGELOG: * X'".to_string()]
        );
    }

    #[test]
    fn test_update_escapes_commit_message() {
        let fixture = Fixture::new(&["Don't panic"]);
        let manager = fixture.manager();
        manager.create().unwrap();

        manager
            .update(&ChangelogUpdate {
                required: true,
                ..Default::default()
            })
            .unwrap();

        assert!(fixture.shell.commands()[0].ends_with(r"CHANGELOG: * Don'\''t panic'"));
        assert!(fixture.content().starts_with("* Don't panic\n"));
    }

    #[test]
    fn test_update_with_rotation_moves_entry_below_header() {
        let fixture = Fixture::new(&["Fixed the login page"]);
        let manager = fixture.manager();
        manager.create().unwrap();

        manager
            .update(&ChangelogUpdate {
                rotate: true,
                name: Some("login".to_string()),
                required: true,
            })
            .unwrap();

        let content = fixture.content();
        let (pending, history) = split(&content);
        assert!(pending.is_empty());
        let header = history.find("=========").unwrap();
        let row = history.find("---- 0.3.1 / 2024-03-09 / login ").unwrap();
        let entry = history.find("* Fixed the login page").unwrap();
        assert!(header < row && row < entry);
        assert_eq!(fixture.shell.commands().len(), 1);
    }

    #[test]
    fn test_newest_history_block_comes_first() {
        let fixture = Fixture::new(&["first", "second"]);
        let manager = fixture.manager();
        manager.create().unwrap();
        let options = ChangelogUpdate {
            rotate: true,
            name: None,
            required: true,
        };

        manager.update(&options).unwrap();
        fixture
            .fs
            .insert(VERSION, "major = 0\nminor = 3\npatch = 2\n");
        manager.update(&options).unwrap();

        let content = fixture.content();
        let newer = content.find("* second").unwrap();
        let older = content.find("* first").unwrap();
        assert!(newer < older);
        assert!(content.find("---- 0.3.2").unwrap() < content.find("---- 0.3.1").unwrap());
    }

    #[test]
    fn test_rotation_with_nothing_pending_is_a_noop() {
        let fixture = Fixture::new(&[]);
        fixture.fs.insert(CHANGELOG, format!("* pending\n{}", template()));
        let manager = fixture.manager();

        assert!(manager.rotate(None, true).unwrap());
        let writes = fixture.fs.write_count();
        let after_first = fixture.content();

        assert!(!manager.rotate(None, true).unwrap());
        assert_eq!(fixture.fs.write_count(), writes);
        assert_eq!(fixture.content(), after_first);
        assert_eq!(
            fixture.shell.commands(),
            vec!["git add CHANGELOG.md && git commit -m 'Rotating CHANGELOG.'".to_string()]
        );
    }

    #[test]
    fn test_optional_empty_answer_rotates_pending() {
        let fixture = Fixture::new(&[""]);
        fixture.fs.insert(CHANGELOG, format!("* earlier\n{}", template()));
        let manager = fixture.manager();

        let change = manager
            .update(&ChangelogUpdate {
                rotate: true,
                name: Some("ignored".to_string()),
                required: false,
            })
            .unwrap();

        assert_eq!(change, None);
        assert_eq!(
            fixture.ask.asked(),
            vec!["Add one line to the changelog (optional):".to_string()]
        );
        assert!(fixture.content().contains("---- 0.3.1 / 2024-03-09 ---"));
        assert!(!fixture.content().contains("ignored"));
    }

    #[test]
    fn test_missing_changelog_is_skipped() {
        let fixture = Fixture::new(&["unused"]);
        let manager = fixture.manager();

        let change = manager
            .update(&ChangelogUpdate {
                rotate: true,
                name: None,
                required: true,
            })
            .unwrap();

        assert_eq!(change, None);
        assert!(fixture.ask.asked().is_empty());
        assert!(fixture.shell.commands().is_empty());
    }

    #[test]
    fn test_rotation_keeps_long_header_rule() {
        let rule = "=".repeat(20);
        let content = format!("* a\n{}\n\n  CHANGELOG\n{rule}\n\nold history\n", delimiter());

        let out = rotated(&content, "---- row").unwrap();

        assert!(out.contains(&format!("  CHANGELOG\n{rule}\n\n---- row\n* a\n\nold history\n")));
        assert_eq!(out.matches('=').count(), 20);
    }

    #[test]
    fn test_rotation_without_header_appends() {
        let content = format!("* a\n{}\nold history\n", delimiter());
        let out = rotated(&content, "---- row").unwrap();
        assert!(out.ends_with("old history\n\n---- row\n* a\n"));
    }
}
