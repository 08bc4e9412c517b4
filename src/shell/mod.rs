//! Shell-facing helpers: startup file paths, reload hints, export verification.

pub mod env;
pub mod paths;
pub mod refresh;

pub use env::{load_exports, resolve_value, ExportCheck, PARENT_SHELL_NOTE};
pub use paths::{expand_home_with, resolve_target, DEFAULT_STARTUP_FILE};
pub use refresh::ShellReloadInfo;
