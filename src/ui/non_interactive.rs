//! Plain UI for pipes and CI.

use super::{OutputMode, UserInterface};

/// UI implementation used when stdout is not a terminal.
///
/// Same layout as [`TerminalUI`](super::TerminalUI) but without styling,
/// so output stays stable when captured.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_hints() {
            println!("  → {}", hint);
        }
    }

    fn show_key_value(&mut self, key: &str, value: &str) {
        println!("  {} = {}", key, value);
    }
}
