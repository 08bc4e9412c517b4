//! Check command implementation.
//!
//! Reports whether a marker already occurs in the target file without
//! touching it. Exits 0 when present, 1 when absent.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::error::{BlockupError, Result};
use crate::shell::resolve_target;
use crate::ui::UserInterface;
use crate::upsert::count_marker;

use super::dispatcher::{Command, CommandResult};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    target: &'a Path,
    marker: &'a str,
    present: bool,
    occurrences: usize,
}

/// The check command implementation.
pub struct CheckCommand {
    home: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(home: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            home: home.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.marker.is_empty() {
            return Err(BlockupError::InvalidBlock {
                message: "marker must not be empty".to_string(),
            });
        }

        let target = resolve_target(self.args.target.as_deref(), self.home.as_deref())?;
        let occurrences = count_marker(&target, &self.args.marker)?;
        let present = occurrences > 0;

        if self.args.json {
            let report = CheckReport {
                target: &target,
                marker: &self.args.marker,
                present,
                occurrences,
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| BlockupError::Other(e.into()))?;
            ui.message(&json);
        } else if present {
            ui.success(&format!(
                "Marker '{}' found in {}",
                self.args.marker,
                target.display()
            ));
            if occurrences > 1 {
                ui.warning(&format!(
                    "Marker occurs {} times; the block may have been appended more than once",
                    occurrences
                ));
            }
        } else {
            ui.message(&format!(
                "Marker '{}' not found in {}",
                self.args.marker,
                target.display()
            ));
        }

        Ok(if present {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
