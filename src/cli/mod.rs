//! Command-line interface for `upsert-block`.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{ApplyArgs, CheckArgs, Cli, Commands, CompletionsArgs, UpsertArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
