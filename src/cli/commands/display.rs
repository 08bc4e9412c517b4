//! Shared display helpers for upsert results.
//!
//! Used by the default upsert command and by `apply`, so both report plans,
//! outcomes, and verification the same way.

use std::path::Path;

use crate::shell::{ExportCheck, ShellReloadInfo, PARENT_SHELL_NOTE};
use crate::ui::UserInterface;
use crate::upsert::{UpsertOutcome, UpsertPlan};

/// Print what a dry run would do.
pub fn show_plan(ui: &mut dyn UserInterface, plan: &UpsertPlan, name: &str) {
    if plan.will_insert() {
        let verb = if plan.target_exists {
            "append to"
        } else {
            "create"
        };
        ui.message(&format!(
            "Would {} {} with block '{}'",
            verb,
            plan.target.display(),
            name
        ));
        if ui.output_mode().shows_details() {
            for line in plan.addition.lines() {
                ui.message(&format!("  + {}", line));
            }
        }
    } else {
        ui.message(&format!(
            "Block '{}' already present in {}; nothing would change",
            name,
            plan.target.display()
        ));
    }
}

/// Print the result of an upsert, including any swallowed backup failure.
pub fn show_outcome(ui: &mut dyn UserInterface, outcome: &UpsertOutcome, name: &str) {
    if let Some(err) = &outcome.backup_error {
        ui.warning(&format!(
            "Could not back up {} ({}); continuing without a backup",
            outcome.target.display(),
            err
        ));
    }

    if outcome.inserted {
        ui.success(&format!(
            "Inserted block '{}' into {}",
            name,
            outcome.target.display()
        ));
    } else {
        ui.success(&format!(
            "Block '{}' already present in {}; nothing changed",
            name,
            outcome.target.display()
        ));
    }

    if let Some(backup) = &outcome.backup {
        ui.message(&format!("  Backup: {}", backup.display()));
    }
}

/// Suggest how to pick up changes to `target` in the running shell.
pub fn show_reload_hint(ui: &mut dyn UserInterface, target: &Path) {
    let info = ShellReloadInfo::detect(target);
    ui.show_hint(&format!(
        "Run `{}` (or `{}`) to load the change into your current shell",
        info.reload_command,
        info.exec_command()
    ));
}

/// Print the exports read back from the process environment.
pub fn show_verification(ui: &mut dyn UserInterface, checks: &[ExportCheck]) {
    if checks.is_empty() {
        ui.warning("Block declares no exports to verify");
        return;
    }

    ui.message("Exports loaded into this process:");
    for check in checks {
        ui.show_key_value(&check.key, check.actual.as_deref().unwrap_or("<unset>"));
        if !check.matches() {
            ui.warning(&format!(
                "{} reads back as {:?}, expected {:?}",
                check.key, check.actual, check.expected
            ));
        }
    }
    ui.message(PARENT_SHELL_NOTE);
}
