//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`]. Running the binary
//! without a subcommand performs a single upsert from the top-level flags.

pub mod apply;
pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod upsert;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
