//! Timestamped backups of target files.
//!
//! Backups are written next to the target as `<target>.bak.<timestamp>` and
//! are never read back or cleaned up.

use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// `strftime` format for the backup suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Build the backup path for `target` at `now`.
///
/// # Example
///
/// ```
/// use blockup::upsert::backup_path;
/// use chrono::{Local, TimeZone};
/// use std::path::Path;
///
/// let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// let path = backup_path(Path::new("/home/me/.bashrc"), &now);
/// assert_eq!(path, Path::new("/home/me/.bashrc.bak.2024-03-09_07:05:01"));
/// ```
pub fn backup_path(target: &Path, now: &DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".bak.");
    name.push(now.format(TIMESTAMP_FORMAT).to_string());
    PathBuf::from(name)
}

/// Copy `target` to a fresh backup file stamped with the current local time.
///
/// Returns `Ok(None)` when the target does not exist.
pub fn create_backup(target: &Path) -> io::Result<Option<PathBuf>> {
    create_backup_at(target, None, &Local::now())
}

/// Copy `target` to a fresh backup file stamped with `now`.
///
/// The backup goes next to the target, or into `dir` when given. Never
/// overwrites: if the stamped name is taken (two runs within the same
/// second), `.1`, `.2`, ... is appended until a free name is found.
pub fn create_backup_at(
    target: &Path,
    dir: Option<&Path>,
    now: &DateTime<Local>,
) -> io::Result<Option<PathBuf>> {
    let contents = match fs::read(target) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let stamped = backup_path(target, now);
    let base = match (dir, stamped.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => stamped,
    };
    let mut attempt = 0u32;

    loop {
        let candidate = if attempt == 0 {
            base.clone()
        } else {
            let mut name = OsString::from(base.as_os_str());
            name.push(format!(".{attempt}"));
            PathBuf::from(name)
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut file) => {
                file.write_all(&contents)?;
                file.sync_all()?;
                return Ok(Some(candidate));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}
