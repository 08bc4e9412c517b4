//! Blockup - idempotent, marker-delimited block upserts for config files.
//!
//! Appends a text block to a user config file (typically a shell startup
//! file such as `~/.bashrc`) unless a marker string already occurs in it,
//! optionally taking a timestamped backup first.
//!
//! # Modules
//!
//! - [`block`] - Block text, markers, and export parsing
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - YAML manifests describing several blocks
//! - [`shell`] - Target path defaults, reload hints, in-process exports
//! - [`ui`] - Terminal output
//! - [`upsert`] - Marker check, backup, and append
//!
//! # Example
//!
//! ```
//! use blockup::block::ConfigBlock;
//! use blockup::upsert::{upsert, UpsertOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let target = dir.path().join(".bashrc");
//!
//! let block = ConfigBlock::delimited("Swisseph Configuration", [("SE_EPHE_PATH", "$HOME/.swisseph")])
//!     .unwrap();
//!
//! let first = upsert(&target, &block, UpsertOptions::checked()).unwrap();
//! let second = upsert(&target, &block, UpsertOptions::checked()).unwrap();
//! assert!(first.inserted);
//! assert!(!second.inserted);
//! ```
//!
//! Exports written to the file only take effect in shells that read it
//! afterwards. This process cannot change the environment of the shell that
//! launched it.

pub mod block;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod shell;
pub mod ui;
pub mod upsert;

pub use error::{BlockupError, Result};
