//! Marker-checked block upserts.

use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::block::{count_occurrences, ConfigBlock};
use crate::error::{BlockupError, Result, Step};

use super::backup::create_backup_at;

/// Switches controlling a single upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOptions {
    /// Copy the existing target to a timestamped backup before touching it.
    pub backup: bool,
    /// Skip the append when the marker is already present.
    ///
    /// With this off the block is appended on every call and the caller is
    /// responsible for idempotence.
    pub check_marker: bool,
}

impl Default for UpsertOptions {
    fn default() -> Self {
        Self::checked()
    }
}

impl UpsertOptions {
    /// Backup enabled, marker checked.
    pub fn checked() -> Self {
        Self {
            backup: true,
            check_marker: true,
        }
    }

    /// No backup, no marker check: a plain append.
    pub fn unchecked() -> Self {
        Self {
            backup: false,
            check_marker: false,
        }
    }
}

/// What an upsert will do to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    /// Marker found; the file is left alone.
    AlreadyPresent,
    /// The block will be appended.
    Append,
}

/// Decision computed from the current target contents, before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertPlan {
    /// Target file path.
    pub target: PathBuf,
    /// Whether the target existed when read.
    pub target_exists: bool,
    /// The chosen action.
    pub action: UpsertAction,
    /// Exact bytes that will be appended (empty for `AlreadyPresent`).
    pub addition: String,
}

impl UpsertPlan {
    /// Whether applying this plan mutates the target.
    pub fn will_insert(&self) -> bool {
        self.action == UpsertAction::Append
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    /// Target file path.
    pub target: PathBuf,
    /// Whether the block was appended.
    pub inserted: bool,
    /// Backup written before the mutation, if any.
    pub backup: Option<PathBuf>,
    /// Why the backup could not be written, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_error: Option<String>,
}

/// Inserts a [`ConfigBlock`] into a target file unless its marker is already there.
///
/// No locking is applied: two processes upserting the same file at once may
/// both see the marker absent and both append.
///
/// # Example
///
/// ```
/// use blockup::block::ConfigBlock;
/// use blockup::upsert::{ConfigBlockUpserter, UpsertOptions};
///
/// let dir = tempfile::tempdir().unwrap();
/// let target = dir.path().join(".bashrc");
/// std::fs::write(&target, "hello\n").unwrap();
///
/// let block = ConfigBlock::new(
///     "FOO Configuration",
///     "# >>> FOO Configuration >>>\nexport FOO=1\n# <<< FOO Configuration <<<\n",
/// )
/// .unwrap();
/// let upserter = ConfigBlockUpserter::new(UpsertOptions::checked());
///
/// assert!(upserter.upsert(&target, &block).unwrap().inserted);
/// assert!(!upserter.upsert(&target, &block).unwrap().inserted);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBlockUpserter {
    options: UpsertOptions,
    backup_dir: Option<PathBuf>,
}

impl ConfigBlockUpserter {
    /// Create an upserter with the given options.
    pub fn new(options: UpsertOptions) -> Self {
        Self {
            options,
            backup_dir: None,
        }
    }

    /// Write backups into `dir` instead of next to the target.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// The options this upserter runs with.
    pub fn options(&self) -> UpsertOptions {
        self.options
    }

    /// Decide what an upsert would do without writing anything.
    pub fn plan(&self, target: &Path, block: &ConfigBlock) -> Result<UpsertPlan> {
        self.validate(block)?;

        let existing = read_target(target)?;
        let target_exists = existing.is_some();
        let content = existing.unwrap_or_default();

        if self.options.check_marker && block.is_present_in(&content) {
            tracing::debug!(
                "Marker '{}' already present in {}",
                block.marker(),
                target.display()
            );
            return Ok(UpsertPlan {
                target: target.to_path_buf(),
                target_exists,
                action: UpsertAction::AlreadyPresent,
                addition: String::new(),
            });
        }

        let mut addition = String::new();
        if !content.is_empty() && !content.ends_with(b"\n") {
            addition.push('\n');
        }
        addition.push_str(block.text());

        Ok(UpsertPlan {
            target: target.to_path_buf(),
            target_exists,
            action: UpsertAction::Append,
            addition,
        })
    }

    /// Back up (if enabled), check the marker, and append the block if needed.
    pub fn upsert(&self, target: &Path, block: &ConfigBlock) -> Result<UpsertOutcome> {
        self.validate(block)?;

        let (backup, backup_error) = if self.options.backup {
            match create_backup_at(target, self.backup_dir.as_deref(), &Local::now()) {
                Ok(Some(path)) => {
                    tracing::info!("Backed up {} to {}", target.display(), path.display());
                    (Some(path), None)
                }
                Ok(None) => {
                    tracing::debug!("No existing {} to back up", target.display());
                    (None, None)
                }
                Err(e) => {
                    tracing::warn!("Backup of {} failed: {}", target.display(), e);
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        let plan = self.plan(target, block)?;
        if plan.will_insert() {
            append(target, &plan.addition)?;
            tracing::info!(
                "Appended block '{}' to {}",
                block.marker(),
                target.display()
            );
        }

        Ok(UpsertOutcome {
            target: target.to_path_buf(),
            inserted: plan.will_insert(),
            backup,
            backup_error,
        })
    }

    fn validate(&self, block: &ConfigBlock) -> Result<()> {
        if self.options.check_marker && !block.contains_marker() {
            return Err(BlockupError::InvalidBlock {
                message: format!(
                    "block text does not contain marker '{}', so repeated runs would append it again",
                    block.marker()
                ),
            });
        }
        Ok(())
    }
}

/// Upsert `block` into `target` with `options`.
pub fn upsert(target: &Path, block: &ConfigBlock, options: UpsertOptions) -> Result<UpsertOutcome> {
    ConfigBlockUpserter::new(options).upsert(target, block)
}

/// Count non-overlapping occurrences of `marker` in `target`; a missing file has none.
pub fn count_marker(target: &Path, marker: &str) -> Result<usize> {
    Ok(read_target(target)?
        .map(|content| count_occurrences(&content, marker.as_bytes()))
        .unwrap_or(0))
}

/// Read the target as raw bytes, treating a missing file as absent.
///
/// Startup files are not required to be UTF-8.
fn read_target(target: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(target) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BlockupError::io(Step::ReadTarget, target, e)),
    }
}

fn append(target: &Path, addition: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(target)
        .map_err(|e| BlockupError::io(Step::AppendTarget, target, e))?;

    file.write_all(addition.as_bytes())
        .map_err(|e| BlockupError::io(Step::AppendTarget, target, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "FOO Configuration";
    const BLOCK: &str = "# >>> FOO Configuration >>>\nexport FOO=1\n# <<< FOO Configuration <<<\n";

    fn foo_block() -> ConfigBlock {
        ConfigBlock::new(MARKER, BLOCK).unwrap()
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".bak."))
            .collect();
        found.sort();
        found
    }

    #[test]
    fn appends_after_existing_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();

        let outcome = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        assert!(outcome.inserted);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            format!("hello\n{BLOCK}")
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();
        let upserter = ConfigBlockUpserter::new(UpsertOptions::checked());

        upserter.upsert(&target, &foo_block()).unwrap();
        let after_first = fs::read_to_string(&target).unwrap();
        let outcome = upserter.upsert(&target, &foo_block()).unwrap();

        assert!(!outcome.inserted);
        assert_eq!(fs::read_to_string(&target).unwrap(), after_first);
    }

    #[test]
    fn empty_target_gets_block_as_sole_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "").unwrap();

        let outcome = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        assert!(outcome.inserted);
        assert_eq!(fs::read_to_string(&target).unwrap(), BLOCK);
    }

    #[test]
    fn missing_target_is_created_without_backup() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");

        let outcome = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        assert!(outcome.inserted);
        assert!(outcome.backup.is_none());
        assert!(backups_in(temp.path()).is_empty());
        assert_eq!(fs::read_to_string(&target).unwrap(), BLOCK);
    }

    #[test]
    fn newline_is_added_when_file_lacks_one() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "alias ll='ls -l'").unwrap();

        upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            format!("alias ll='ls -l'\n{BLOCK}")
        );
    }

    #[test]
    fn leading_blank_line_in_block_is_preserved() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();
        let block = ConfigBlock::new(MARKER, format!("\n{BLOCK}")).unwrap();

        upsert(&target, &block, UpsertOptions::checked()).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            format!("hello\n\n{BLOCK}")
        );
    }

    #[test]
    fn backup_matches_original_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();

        let outcome = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        let backup = outcome.backup.unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), "hello\n");
        assert_eq!(backups_in(temp.path()), vec![backup]);
    }

    #[test]
    fn backup_is_taken_even_when_marker_present() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, format!("hello\n{BLOCK}")).unwrap();

        let outcome = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap();

        assert!(!outcome.inserted);
        assert!(outcome.backup.is_some());
    }

    #[test]
    fn no_backup_when_disabled() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();
        let options = UpsertOptions {
            backup: false,
            check_marker: true,
        };

        let outcome = upsert(&target, &foo_block(), options).unwrap();

        assert!(outcome.backup.is_none());
        assert!(backups_in(temp.path()).is_empty());
    }

    #[test]
    fn unchecked_mode_appends_every_time() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        let upserter = ConfigBlockUpserter::new(UpsertOptions::unchecked());

        assert!(upserter.upsert(&target, &foo_block()).unwrap().inserted);
        assert!(upserter.upsert(&target, &foo_block()).unwrap().inserted);

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            format!("{BLOCK}{BLOCK}")
        );
    }

    #[test]
    fn unchecked_mode_allows_block_without_marker() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        let block = ConfigBlock::new("absent", "export BAR=2\n").unwrap();

        let outcome = upsert(&target, &block, UpsertOptions::unchecked()).unwrap();

        assert!(outcome.inserted);
    }

    #[test]
    fn checked_mode_rejects_block_without_marker() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        let block = ConfigBlock::new("absent", "export BAR=2\n").unwrap();

        let err = upsert(&target, &block, UpsertOptions::checked()).unwrap_err();

        assert!(matches!(err, BlockupError::InvalidBlock { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn missing_parent_directory_fails_on_append() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("missing").join(".bashrc");

        let err = upsert(&target, &foo_block(), UpsertOptions::checked()).unwrap_err();

        assert!(matches!(
            err,
            BlockupError::Io {
                step: Step::AppendTarget,
                ..
            }
        ));
    }

    #[test]
    fn directory_target_fails_on_read() {
        let temp = TempDir::new().unwrap();
        let options = UpsertOptions {
            backup: false,
            check_marker: true,
        };

        let err = upsert(temp.path(), &foo_block(), options).unwrap_err();

        assert!(matches!(
            err,
            BlockupError::Io {
                step: Step::ReadTarget,
                ..
            }
        ));
    }

    #[test]
    fn count_marker_counts_occurrences() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");

        assert_eq!(count_marker(&target, MARKER).unwrap(), 0);

        fs::write(&target, format!("{BLOCK}{BLOCK}")).unwrap();
        assert_eq!(count_marker(&target, MARKER).unwrap(), 4);
        assert_eq!(count_marker(&target, ">>> FOO").unwrap(), 2);
    }

    #[test]
    fn plan_does_not_write() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello").unwrap();
        let upserter = ConfigBlockUpserter::default();

        let plan = upserter.plan(&target, &foo_block()).unwrap();

        assert!(plan.will_insert());
        assert!(plan.target_exists);
        assert_eq!(plan.addition, format!("\n{BLOCK}"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        assert!(backups_in(temp.path()).is_empty());
    }

    #[test]
    fn plan_reports_present_marker() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "# FOO Configuration lives elsewhere\n").unwrap();

        let plan = ConfigBlockUpserter::default()
            .plan(&target, &foo_block())
            .unwrap();

        assert_eq!(plan.action, UpsertAction::AlreadyPresent);
        assert!(plan.addition.is_empty());
    }

    #[test]
    fn non_utf8_target_is_upserted() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, b"# caf\xe9 au lait").unwrap();
        let upserter = ConfigBlockUpserter::new(UpsertOptions::checked());

        assert!(upserter.upsert(&target, &foo_block()).unwrap().inserted);
        assert!(!upserter.upsert(&target, &foo_block()).unwrap().inserted);

        let mut expected = b"# caf\xe9 au lait\n".to_vec();
        expected.extend_from_slice(BLOCK.as_bytes());
        assert_eq!(fs::read(&target).unwrap(), expected);
        assert_eq!(count_marker(&target, MARKER).unwrap(), 2);
    }

    #[test]
    fn failed_backup_does_not_stop_the_append() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        fs::write(&target, "hello\n").unwrap();
        let upserter = ConfigBlockUpserter::new(UpsertOptions::checked())
            .with_backup_dir(temp.path().join("no-such-dir"));

        let outcome = upserter.upsert(&target, &foo_block()).unwrap();

        assert!(outcome.inserted);
        assert!(outcome.backup.is_none());
        assert!(outcome.backup_error.is_some());
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            format!("hello\n{BLOCK}")
        );
    }

    #[test]
    fn backup_dir_holds_the_backup() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join(".bashrc");
        let dir = temp.path().join("backups");
        fs::create_dir(&dir).unwrap();
        fs::write(&target, "hello\n").unwrap();
        let upserter = ConfigBlockUpserter::new(UpsertOptions::checked()).with_backup_dir(&dir);

        let outcome = upserter.upsert(&target, &foo_block()).unwrap();

        let backup = outcome.backup.unwrap();
        assert_eq!(backup.parent(), Some(dir.as_path()));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "hello\n");
    }
}
