//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for styled output on a TTY
//! - [`NonInteractiveUI`] for pipes, CI, and tests against the binary
//! - [`MockUI`] for capturing output in unit tests
//!
//! # Example
//!
//! ```
//! use blockup::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(OutputMode::Quiet);
//! ui.success("Block inserted");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, BlockupTheme};

/// Trait for user interface output.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Display a follow-up hint (e.g. how to reload the shell).
    fn show_hint(&mut self, hint: &str);

    /// Display a `key = value` line.
    fn show_key_value(&mut self, key: &str, value: &str);
}
