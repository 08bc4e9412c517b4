//! Shell reload hints.
//!
//! Writing to a startup file has no effect on shells that are already
//! running. This module works out what the user should type to pick up the
//! change.

use std::path::Path;

/// How to reload the user's shell after a startup file changed.
///
/// # Example
///
/// ```
/// use blockup::shell::ShellReloadInfo;
/// use std::path::Path;
///
/// let info = ShellReloadInfo::for_shell("/bin/bash", Path::new("/home/me/.bashrc"));
/// assert_eq!(info.shell, "bash");
/// assert_eq!(info.reload_command, "source /home/me/.bashrc");
/// assert_eq!(info.exec_command(), "exec bash");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellReloadInfo {
    /// Shell name (bash, zsh, fish, sh).
    pub shell: String,
    /// Command to re-read the modified file in the current shell.
    pub reload_command: String,
}

impl ShellReloadInfo {
    /// Build reload info for the shell named in `$SHELL`, falling back to `sh`.
    pub fn detect(target: &Path) -> Self {
        let shell_path = std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string());
        Self::for_shell(&shell_path, target)
    }

    /// Build reload info for an explicit shell path or name.
    pub fn for_shell(shell_path: &str, target: &Path) -> Self {
        let shell = Path::new(shell_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("sh")
            .to_string();

        // POSIX sh and dash lack `source`
        let reload_command = match shell.as_str() {
            "bash" | "zsh" | "fish" | "ksh" => format!("source {}", target.display()),
            _ => format!(". {}", target.display()),
        };

        Self {
            shell,
            reload_command,
        }
    }

    /// Get an alternative reload method (exec the shell).
    pub fn exec_command(&self) -> String {
        format!("exec {}", self.shell)
    }
}
