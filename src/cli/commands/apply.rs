//! Apply command implementation.
//!
//! Upserts every block in a YAML manifest, in order, stopping at the first
//! failure.

use std::path::{Path, PathBuf};

use crate::cli::args::ApplyArgs;
use crate::error::Result;
use crate::manifest::{load_manifest, ResolveContext};
use crate::ui::UserInterface;
use crate::upsert::ConfigBlockUpserter;

use super::dispatcher::{Command, CommandResult};
use super::display::{show_outcome, show_plan, show_reload_hint};

/// The apply command implementation.
pub struct ApplyCommand {
    home: Option<PathBuf>,
    args: ApplyArgs,
}

impl ApplyCommand {
    /// Create a new apply command.
    pub fn new(home: Option<&Path>, args: ApplyArgs) -> Self {
        Self {
            home: home.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ApplyArgs {
        &self.args
    }
}

impl Command for ApplyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manifest = load_manifest(&self.args.manifest)?;
        let base_dir = self
            .args
            .manifest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let ctx = ResolveContext::new(base_dir)
            .with_default_target(self.args.target.as_deref())
            .with_home(self.home.as_deref());

        let blocks = manifest.resolve(&ctx)?;
        tracing::debug!(
            "Applying {} block(s) from {}",
            blocks.len(),
            self.args.manifest.display()
        );

        let mut inserted = 0;
        let mut present = 0;
        let mut touched: Vec<PathBuf> = Vec::new();

        for resolved in &blocks {
            let upserter = ConfigBlockUpserter::new(resolved.options);

            if self.args.dry_run {
                let plan = upserter.plan(&resolved.target, &resolved.block)?;
                show_plan(ui, &plan, &resolved.name);
                if plan.will_insert() {
                    inserted += 1;
                } else {
                    present += 1;
                }
                continue;
            }

            let outcome = upserter.upsert(&resolved.target, &resolved.block)?;
            show_outcome(ui, &outcome, &resolved.name);
            if outcome.inserted {
                inserted += 1;
                if !touched.contains(&outcome.target) {
                    touched.push(outcome.target.clone());
                }
            } else {
                present += 1;
            }
        }

        let verb = if self.args.dry_run {
            "would be inserted"
        } else {
            "inserted"
        };
        ui.message(&format!(
            "{} block(s) {}, {} already present",
            inserted, verb, present
        ));

        for target in &touched {
            show_reload_hint(ui, target);
        }

        Ok(CommandResult::success())
    }
}
