//! Startup file locations.

use std::path::{Path, PathBuf};

use crate::error::{BlockupError, Result};

/// Startup file used when no target is given.
pub const DEFAULT_STARTUP_FILE: &str = ".bashrc";

/// Pick the target file: an explicit path (with `~` expanded) or the default
/// startup file under `home`.
pub fn resolve_target(explicit: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    match (explicit, home) {
        (Some(path), home) => Ok(expand_home_with(path, home)),
        (None, Some(home)) => Ok(home.join(DEFAULT_STARTUP_FILE)),
        (None, None) => Err(BlockupError::MissingArgument {
            name: "--target (no home directory to default to)".to_string(),
        }),
    }
}

/// Expand a leading `~` against `home`; paths are returned unchanged if
/// `home` is `None` or the path does not start with `~`.
///
/// # Example
///
/// ```
/// use blockup::shell::expand_home_with;
/// use std::path::Path;
///
/// let home = Path::new("/home/me");
/// assert_eq!(expand_home_with(Path::new("~/.bashrc"), Some(home)), home.join(".bashrc"));
/// assert_eq!(expand_home_with(Path::new("/etc/profile"), Some(home)), Path::new("/etc/profile"));
/// ```
pub fn expand_home_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_tilde_prefix() {
        let home = Path::new("/home/me");
        assert_eq!(
            expand_home_with(Path::new("~/.config/fish/config.fish"), Some(home)),
            PathBuf::from("/home/me/.config/fish/config.fish")
        );
    }

    #[test]
    fn expands_bare_tilde() {
        let home = Path::new("/home/me");
        assert_eq!(
            expand_home_with(Path::new("~"), Some(home)),
            PathBuf::from("/home/me")
        );
    }

    #[test]
    fn leaves_other_paths_alone() {
        let home = Path::new("/home/me");
        assert_eq!(
            expand_home_with(Path::new("relative/.bashrc"), Some(home)),
            PathBuf::from("relative/.bashrc")
        );
        assert_eq!(
            expand_home_with(Path::new("~other/.bashrc"), Some(home)),
            PathBuf::from("~other/.bashrc")
        );
    }

    #[test]
    fn no_home_means_no_expansion() {
        assert_eq!(
            expand_home_with(Path::new("~/.bashrc"), None),
            PathBuf::from("~/.bashrc")
        );
    }

    #[test]
    fn resolve_target_defaults_to_bashrc() {
        let target = resolve_target(None, Some(Path::new("/home/me"))).unwrap();
        assert_eq!(target, PathBuf::from("/home/me/.bashrc"));
    }

    #[test]
    fn resolve_target_prefers_explicit() {
        let target =
            resolve_target(Some(Path::new("~/.zshrc")), Some(Path::new("/home/me"))).unwrap();
        assert_eq!(target, PathBuf::from("/home/me/.zshrc"));
    }

    #[test]
    fn resolve_target_without_home_needs_explicit() {
        let err = resolve_target(None, None).unwrap_err();
        assert!(err.is_usage());
    }
}
