//! Default upsert command.
//!
//! Running `upsert-block` without a subcommand inserts one block into one
//! target file.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::block::ConfigBlock;
use crate::cli::args::UpsertArgs;
use crate::error::{BlockupError, Result};
use crate::shell::{expand_home_with, load_exports, resolve_target, ExportCheck};
use crate::ui::UserInterface;
use crate::upsert::{ConfigBlockUpserter, UpsertAction, UpsertOptions, UpsertOutcome};

use super::dispatcher::{Command, CommandResult};
use super::display::{show_outcome, show_plan, show_reload_hint, show_verification};

/// JSON shape for `--json`.
#[derive(Debug, Serialize)]
struct UpsertReport<'a> {
    #[serde(flatten)]
    outcome: &'a UpsertOutcome,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    exports: &'a [ExportCheck],
}

/// JSON shape for `--dry-run --json`.
#[derive(Debug, Serialize)]
struct DryRunReport<'a> {
    target: &'a Path,
    action: UpsertAction,
    dry_run: bool,
}

/// The upsert command implementation.
pub struct UpsertCommand {
    home: Option<PathBuf>,
    args: UpsertArgs,
}

impl UpsertCommand {
    /// Create a new upsert command.
    pub fn new(home: Option<&Path>, args: UpsertArgs) -> Self {
        Self {
            home: home.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &UpsertArgs {
        &self.args
    }

    /// Options implied by `--no-backup` and `--force`.
    pub fn options(&self) -> UpsertOptions {
        UpsertOptions {
            backup: !self.args.no_backup,
            check_marker: !self.args.force,
        }
    }

    fn target(&self) -> Result<PathBuf> {
        resolve_target(self.args.target.as_deref(), self.home.as_deref())
    }

    fn block(&self) -> Result<ConfigBlock> {
        let marker = self
            .args
            .marker
            .clone()
            .ok_or_else(|| BlockupError::MissingArgument {
                name: "--marker".to_string(),
            })?;

        match (&self.args.block, &self.args.block_file) {
            (Some(text), _) => ConfigBlock::new(marker, text.as_str()),
            (None, Some(path)) => {
                ConfigBlock::from_file(marker, &expand_home_with(path, self.home.as_deref()))
            }
            (None, None) => Err(BlockupError::MissingArgument {
                name: "--block-file or --block".to_string(),
            }),
        }
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| BlockupError::Other(e.into()))
    }
}

impl Command for UpsertCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let block = self.block()?;
        let target = self.target()?;
        let mut upserter = ConfigBlockUpserter::new(self.options());
        if let Some(dir) = &self.args.backup_dir {
            upserter = upserter.with_backup_dir(expand_home_with(dir, self.home.as_deref()));
        }

        tracing::debug!(
            "Upserting '{}' into {} with {:?}",
            block.marker(),
            target.display(),
            upserter.options()
        );

        if self.args.dry_run {
            let plan = upserter.plan(&target, &block)?;
            if self.args.json {
                ui.message(&Self::to_json(&DryRunReport {
                    target: &plan.target,
                    action: plan.action,
                    dry_run: true,
                })?);
            } else {
                show_plan(ui, &plan, block.marker());
            }
            return Ok(CommandResult::success());
        }

        let outcome = upserter.upsert(&target, &block)?;

        let checks = if self.args.verify {
            load_exports(&block.exports())
        } else {
            Vec::new()
        };

        if self.args.json {
            ui.message(&Self::to_json(&UpsertReport {
                outcome: &outcome,
                exports: &checks,
            })?);
            return Ok(CommandResult::success());
        }

        show_outcome(ui, &outcome, block.marker());
        if self.args.verify {
            show_verification(ui, &checks);
        }
        if outcome.inserted || self.args.verify {
            show_reload_hint(ui, &target);
        }

        Ok(CommandResult::success())
    }
}
