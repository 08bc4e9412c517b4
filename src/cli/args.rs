//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Insert a marked block into a shell startup file, once.
#[derive(Debug, Parser)]
#[command(name = "upsert-block")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub upsert: UpsertArgs,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report whether a marker is present in the target file
    Check(CheckArgs),

    /// Upsert every block listed in a YAML manifest
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the default upsert operation.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpsertArgs {
    /// File to insert the block into [default: ~/.bashrc]
    #[arg(short, long, env = "UPSERT_BLOCK_TARGET", value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Literal substring that identifies the block
    #[arg(short, long, env = "UPSERT_BLOCK_MARKER")]
    pub marker: Option<String>,

    /// File containing the block text
    #[arg(
        short = 'f',
        long,
        env = "UPSERT_BLOCK_FILE",
        value_name = "PATH",
        conflicts_with = "block"
    )]
    pub block_file: Option<PathBuf>,

    /// Block text given inline
    #[arg(short, long, value_name = "TEXT")]
    pub block: Option<String>,

    /// Skip the timestamped backup of the target
    #[arg(long)]
    pub no_backup: bool,

    /// Write the backup into this directory instead of next to the target
    #[arg(long, value_name = "DIR", conflicts_with = "no_backup")]
    pub backup_dir: Option<PathBuf>,

    /// Append even if the marker is already present
    #[arg(long)]
    pub force: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Load the block's exports into this process and print them
    #[arg(long)]
    pub verify: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// File to inspect [default: ~/.bashrc]
    #[arg(short, long, env = "UPSERT_BLOCK_TARGET", value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Literal substring to look for
    #[arg(short, long, env = "UPSERT_BLOCK_MARKER")]
    pub marker: String,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `apply` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ApplyArgs {
    /// Manifest file listing the blocks
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Target for blocks that do not name one [default: ~/.bashrc]
    #[arg(short, long, env = "UPSERT_BLOCK_TARGET", value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
